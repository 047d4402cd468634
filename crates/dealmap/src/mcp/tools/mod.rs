mod deals;

use serde::{Deserialize, Serialize};

// Re-export types needed by tool handlers
pub use super::{JsonRpcError, Tool};

// MCP Protocol types for tools
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
pub struct ToolsCapability {}

#[derive(Debug, Serialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ToolsList {
    pub tools: Vec<Tool>,
}

#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

pub fn handle_initialize() -> Result<serde_json::Value, JsonRpcError> {
    let result = InitializeResult {
        protocol_version: "2024-11-05".to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability {}),
        },
        server_info: ServerInfo {
            name: "dealmap".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    serde_json::to_value(result).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Internal error: {e}"),
        data: None,
    })
}

fn search_input_schema(what: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "location": {
                "type": "string",
                "description": format!("Where to search for {what}: \"City, ST\", a ZIP code, or \"lat,lon\"")
            },
            "query": {
                "type": "string",
                "description": "Keyword filter; \"*\" or omitted matches everything"
            },
            "distance": {
                "type": "number",
                "description": "Search radius in miles (server default: 5)"
            },
            "start_index": {
                "type": "number",
                "description": "Index of the first result, for paging (server default: 0)"
            },
            "page_size": {
                "type": "number",
                "description": "Results per page (server default: 20, max: 100)"
            },
            "activity": {
                "type": "number",
                "description": "Activity category code"
            },
            "capability": {
                "type": "number",
                "description": "Capability (deal type) code"
            },
            "expiration_date": {
                "type": "string",
                "description": "Only deals expiring on or after this date (YYYY-MM-DD)"
            }
        },
        "required": ["location"]
    })
}

pub fn handle_tools_list() -> Result<serde_json::Value, JsonRpcError> {
    let tools = vec![
        Tool {
            name: "deals_search".to_string(),
            description: "Search The Dealmap for deals around a location. Returns the matching deals as flat attribute objects (id, title, business_name, address_line, expiration_time, ...) plus the total number of matches on the server; use start_index and page_size to page. Requires the DEALMAP_API_KEY environment variable.".to_string(),
            input_schema: search_input_schema("deals"),
        },
        Tool {
            name: "businesses_search".to_string(),
            description: "Search The Dealmap for businesses around a location. Returns the matching businesses as flat attribute objects (business_id, name, address_line, city, phone, ...) plus the total number of matches on the server. Requires the DEALMAP_API_KEY environment variable.".to_string(),
            input_schema: search_input_schema("businesses"),
        },
        Tool {
            name: "deal_details".to_string(),
            description: "Fetch every attribute of a single deal by its id (the `id` field returned by deals_search). Requires the DEALMAP_API_KEY environment variable.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "deal_id": {
                        "type": "string",
                        "description": "Deal identifier, e.g. 5-EE22936BCFB0E2E1C6AE028D3A17928A"
                    }
                },
                "required": ["deal_id"]
            }),
        },
    ];

    let result = ToolsList { tools };

    serde_json::to_value(result).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Internal error: {e}"),
        data: None,
    })
}

pub async fn handle_tools_call(
    params: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: CallToolParams = serde_json::from_value(params.unwrap_or(serde_json::Value::Null))
        .map_err(|e| JsonRpcError {
            code: -32602,
            message: format!("Invalid params: {e}"),
            data: None,
        })?;

    match params.name.as_str() {
        "deals_search" => {
            deals::handle_search(crate::search::SearchKind::Deals, params.arguments, global)
                .await
        }
        "businesses_search" => {
            deals::handle_search(
                crate::search::SearchKind::Businesses,
                params.arguments,
                global,
            )
            .await
        }
        "deal_details" => deals::handle_deal_details(params.arguments, global).await,
        _ => Err(JsonRpcError {
            code: -32602,
            message: format!("Unknown tool: {}", params.name),
            data: None,
        }),
    }
}
