mod cli;
mod stdio;
mod tools;

pub use cli::App;

use crate::prelude::*;
use serde::{Deserialize, Serialize};

// JSON-RPC 2.0 types
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<serde_json::Value>,
    method: String,
    params: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    jsonrpc: String,
    id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

// MCP Protocol types
#[derive(Debug, Serialize)]
pub struct Tool {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        cli::Commands::Stdio => stdio::run_stdio(global).await,
    }
}

/// Handle one JSON-RPC message. Notifications get no response.
pub async fn handle_request(request_str: &str, global: &crate::Global) -> Option<JsonRpcResponse> {
    let request: JsonRpcRequest = match serde_json::from_str(request_str) {
        Ok(req) => req,
        Err(e) => {
            return Some(JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id: None,
                result: None,
                error: Some(JsonRpcError {
                    code: -32700,
                    message: format!("Parse error: {e}"),
                    data: None,
                }),
            });
        }
    };

    if request.id.is_none() && request.method.starts_with("notifications/") {
        return None;
    }

    let result = match request.method.as_str() {
        "initialize" => tools::handle_initialize(),
        "tools/list" => tools::handle_tools_list(),
        "tools/call" => tools::handle_tools_call(request.params, global).await,
        method => Err(JsonRpcError {
            code: -32601,
            message: format!("Method not found: {method}"),
            data: None,
        }),
    };

    Some(match result {
        Ok(value) => JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id,
            result: Some(value),
            error: None,
        },
        Err(error) => JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id,
            result: None,
            error: Some(error),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global() -> crate::Global {
        crate::Global {
            api_key: None,
            base_url: dealmap::DEFAULT_BASE_URL.to_string(),
            verbose: false,
        }
    }

    #[tokio::test]
    async fn test_parse_error() {
        let response = handle_request("{not json", &global()).await.unwrap();
        assert_eq!(response.error.unwrap().code, -32700);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = handle_request(
            r#"{"jsonrpc":"2.0","id":1,"method":"resources/list"}"#,
            &global(),
        )
        .await
        .unwrap();

        let error = response.error.unwrap();
        assert_eq!(error.code, -32601);
        assert!(error.message.contains("resources/list"));
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let response = handle_request(
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            &global(),
        )
        .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = handle_request(
            r#"{"jsonrpc":"2.0","id":"a","method":"initialize","params":{}}"#,
            &global(),
        )
        .await
        .unwrap();

        assert_eq!(response.id, Some(serde_json::json!("a")));
        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "dealmap");
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let response = handle_request(
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            &global(),
        )
        .await
        .unwrap();

        let result = response.result.unwrap();
        let names: Vec<&str> = result["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|tool| tool["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["deals_search", "businesses_search", "deal_details"]);
    }

    #[tokio::test]
    async fn test_tool_call_without_api_key_fails() {
        let response = handle_request(
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"deals_search","arguments":{"location":"Miami, FL"}}}"#,
            &global(),
        )
        .await
        .unwrap();

        let error = response.error.unwrap();
        assert_eq!(error.code, -32603);
        assert!(error.message.contains("Failed to create Dealmap client"));
        assert!(error.message.contains("You must supply an API key"));
    }

    #[tokio::test]
    async fn test_tool_call_error_keeps_cause_without_api_key() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let global = crate::Global {
            api_key: Some("SECRET-KEY".to_string()),
            base_url: format!("http://{addr}"),
            verbose: false,
        };
        let response = handle_request(
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"deals_search","arguments":{"location":"Miami, FL"}}}"#,
            &global,
        )
        .await
        .unwrap();

        let error = response.error.unwrap();
        assert_eq!(error.code, -32603);
        assert!(error.message.contains("Failed to search deals: Network error"));
        assert!(!error.message.contains("SECRET-KEY"));
    }
}
