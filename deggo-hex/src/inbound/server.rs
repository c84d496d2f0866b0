//! MCP server: JSON-RPC 2.0 over newline-delimited stdio.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::tools::{call_tool, tool_definitions};
use crate::Deggo;

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "deggo-mcp";

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Absent for notifications
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError { code, message }),
        }
    }
}

/// MCP server exposing Deggo's tools.
pub struct McpServer {
    deggo: Deggo,
}

impl McpServer {
    pub fn new(deggo: Deggo) -> Self {
        Self { deggo }
    }

    /// Serves stdin/stdout until EOF or a shutdown signal.
    pub async fn run_stdio(self) -> std::io::Result<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();

        tokio::select! {
            result = self.serve(reader, writer) => result?,
            _ = shutdown_signal() => {}
        }

        Ok(())
    }

    /// Processes one request per line until the reader is exhausted.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::info!("Deggo MCP server started");
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            tracing::debug!(request = line, "Received");

            let Some(response) = self.handle_line(line).await else {
                continue;
            };

            let encoded = serde_json::to_string(&response).map_err(std::io::Error::other)?;
            tracing::debug!(response = %encoded, "Sending");

            writer.write_all(encoded.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        tracing::info!("Input closed, MCP server stopping");
        Ok(())
    }

    /// Answers one raw JSON-RPC message. Notifications get no answer.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        let id = request.id?;
        Some(self.handle_request(id, &request.method, request.params).await)
    }

    async fn handle_request(&self, id: Value, method: &str, params: Value) -> JsonRpcResponse {
        match method {
            "initialize" => JsonRpcResponse::success(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {
                        "tools": { "listChanged": false }
                    },
                    "serverInfo": {
                        "name": SERVER_NAME,
                        "version": env!("CARGO_PKG_VERSION")
                    }
                }),
            ),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_definitions() })),
            "tools/call" => {
                let name = params.get("name").and_then(|n| n.as_str()).unwrap_or("");
                let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

                let result = call_tool(&self.deggo, name, arguments).await;
                JsonRpcResponse::success(id, json!(result))
            }
            other => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping MCP server");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service_tests::tests::MockProvider;
    use deggo_types::ProviderId;

    fn server() -> McpServer {
        McpServer::new(
            Deggo::with_providers(vec![MockProvider::new(ProviderId::Orange).into_arc()])
                .unwrap(),
        )
    }

    async fn call(line: &str) -> Value {
        let response = server().handle_line(line).await.unwrap();
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = call(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#).await;

        assert_eq!(response["id"], json!(1));
        assert_eq!(response["result"]["protocolVersion"], json!(PROTOCOL_VERSION));
        assert_eq!(response["result"]["serverInfo"]["name"], json!(SERVER_NAME));
        assert!(response.get("error").is_none());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let response = call(r#"{"jsonrpc":"2.0","id":"a","method":"tools/list"}"#).await;

        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 3);
        assert_eq!(tools[0]["name"], json!("send-payment"));
        assert!(tools[0]["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn test_tools_call_wraps_result() {
        let response = call(
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"test-connections","arguments":{}}}"#,
        )
        .await;

        let content = &response["result"]["content"][0];
        assert_eq!(content["type"], json!("text"));
        assert_eq!(
            content["text"],
            json!("Provider Connection Status\n\n- orange: ✓ Connected")
        );
        assert!(response["result"].get("isError").is_none());
    }

    #[tokio::test]
    async fn test_tool_failure_is_flagged() {
        let response = call(
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"nope"}}"#,
        )
        .await;

        assert_eq!(response["result"]["isError"], json!(true));
        assert_eq!(
            response["result"]["content"][0]["text"],
            json!("Error: Unknown tool: nope")
        );
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = call(r#"{"jsonrpc":"2.0","id":4,"method":"resources/list"}"#).await;

        assert_eq!(response["error"]["code"], json!(METHOD_NOT_FOUND));
        assert!(response.get("result").is_none());
    }

    #[tokio::test]
    async fn test_parse_error() {
        let response = call("{not json").await;

        assert_eq!(response["id"], Value::Null);
        assert_eq!(response["error"]["code"], json!(PARSE_ERROR));
    }

    #[tokio::test]
    async fn test_notification_gets_no_reply() {
        let reply = server()
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn test_serve_writes_one_line_per_request() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n"
        );
        let mut output = Vec::new();

        server().serve(input.as_bytes(), &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], json!(1));
        assert_eq!(lines[1]["id"], json!(2));
    }
}
