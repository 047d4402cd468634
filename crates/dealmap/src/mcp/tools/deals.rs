use crate::prelude::{eprintln, *};
use crate::search::SearchKind;
use chrono::NaiveDate;
use dealmap::SearchOptions;
use serde::{Deserialize, Serialize};

use super::{CallToolResult, Content, JsonRpcError};

#[derive(Debug, Deserialize)]
struct SearchToolArgs {
    location: String,
    query: Option<String>,
    distance: Option<u32>,
    start_index: Option<u32>,
    page_size: Option<u32>,
    activity: Option<u32>,
    capability: Option<u32>,
    expiration_date: Option<String>,
}

impl SearchToolArgs {
    fn into_options(self) -> Result<SearchOptions, JsonRpcError> {
        let expiration_date = self
            .expiration_date
            .map(|date| {
                date.parse::<NaiveDate>()
                    .map_err(|e| invalid_arguments(format!("expiration_date {date:?}: {e}")))
            })
            .transpose()?;

        Ok(SearchOptions {
            location: Some(self.location),
            query: self.query,
            distance: self.distance,
            start_index: self.start_index,
            page_size: self.page_size,
            activity: self.activity,
            capability: self.capability,
            expiration_date,
            extra: Default::default(),
        })
    }
}

pub async fn handle_search(
    kind: SearchKind,
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    let args: SearchToolArgs = parse_arguments(arguments)?;

    if global.verbose {
        eprintln!(
            "Calling {kind}_search: location={}, query={:?}, start_index={:?}, page_size={:?}",
            args.location, args.query, args.start_index, args.page_size
        );
    }

    let options = args.into_options()?;

    // Call the search module's data function
    let result = crate::search::search_data(kind, &options, global)
        .await
        .map_err(tool_error)?;

    text_result(&result)
}

pub async fn handle_deal_details(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct DealDetailsArgs {
        deal_id: String,
    }

    let args: DealDetailsArgs = parse_arguments(arguments)?;

    if global.verbose {
        eprintln!("Calling deal_details: deal_id={}", args.deal_id);
    }

    // Call the details module's data function
    let deal = crate::details::deal_details_data(&args.deal_id, global)
        .await
        .map_err(tool_error)?;

    text_result(&deal)
}

fn parse_arguments<T: serde::de::DeserializeOwned>(
    arguments: Option<serde_json::Value>,
) -> Result<T, JsonRpcError> {
    serde_json::from_value(arguments.unwrap_or(serde_json::Value::Null))
        .map_err(|e| invalid_arguments(e.to_string()))
}

fn invalid_arguments(message: String) -> JsonRpcError {
    JsonRpcError {
        code: -32602,
        message: format!("Invalid arguments: {message}"),
        data: None,
    }
}

fn tool_error(error: color_eyre::eyre::Report) -> JsonRpcError {
    JsonRpcError {
        code: -32603,
        message: format!("Tool execution error: {error:#}"),
        data: None,
    }
}

/// Convert to JSON and wrap in MCP result format
fn text_result<T: Serialize>(data: &T) -> Result<serde_json::Value, JsonRpcError> {
    let json_string = serde_json::to_string_pretty(data).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Serialization error: {e}"),
        data: None,
    })?;

    let result = CallToolResult {
        content: vec![Content::Text { text: json_string }],
        is_error: None,
    };

    serde_json::to_value(result).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Internal error: {e}"),
        data: None,
    })
}
