// Tool invocation (`tools/call`)

use crate::protocol::{JsonRpcRequest, JsonRpcResponse};
use crate::transport::{post_rpc, McpTransport};
use mcplink_core::{ServerConnection, ToolCallResult};
use reqwest::StatusCode;
use serde_json::{Map, Value};

/// Call one tool on a server. Every failure comes back as `ToolCallResult::Failure`.
pub async fn call_tool<T>(
    transport: &T,
    server: &ServerConnection,
    tool_name: &str,
    arguments: Map<String, Value>,
    session_id: Option<&str>,
) -> ToolCallResult
where
    T: McpTransport + ?Sized,
{
    let request = JsonRpcRequest::call_tool(tool_name, arguments);

    let response = match post_rpc(transport, server, session_id, &request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Failed to call tool {} on MCP server {}: {}", tool_name, server.name, e);
            return ToolCallResult::failure(e.to_string());
        }
    };

    let status = response.status();
    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Failed to call tool {} on MCP server {}: {}", tool_name, server.name, e);
            return ToolCallResult::failure(e.to_string());
        }
    };

    if status == StatusCode::OK {
        let body: JsonRpcResponse = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(
                    "Failed to call tool {} on MCP server {}: invalid JSON-RPC response: {}",
                    tool_name,
                    server.name,
                    e
                );
                return ToolCallResult::failure(e.to_string());
            }
        };

        if let Some(result) = body.result {
            return ToolCallResult::success(result);
        }
        if let Some(error) = body.error {
            tracing::debug!(server = %server.name, tool = tool_name, "Tool call returned a JSON-RPC error");
            return ToolCallResult::failure(error);
        }
    }

    tracing::warn!(
        server = %server.name,
        tool = tool_name,
        status = status.as_u16(),
        "Unexpected tools/call response"
    );
    ToolCallResult::failure(format!("HTTP {}: {}", status.as_u16(), text))
}

#[cfg(test)]
mod tests {
    use crate::transport::{McpTransport, SseTransport, StreamableHttpTransport};
    use mcplink_core::{ServerConnection, ToolCallResult, Transport};
    use reqwest::Client;
    use serde_json::{json, Map, Value};
    use std::time::{Duration, Instant};
    use wiremock::matchers::{body_json, header, method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    async fn mock_with(response: ResponseTemplate) -> MockServer {
        let mock = MockServer::start().await;
        Mock::given(method("POST")).respond_with(response).mount(&mock).await;
        mock
    }

    #[tokio::test]
    async fn test_success_result() {
        let mock = MockServer::start().await;

        Mock::given(method("POST"))
            .and(query_param("sessionId", "s1"))
            .and(body_json(json!({
                "jsonrpc": "2.0",
                "id": 2,
                "method": "tools/call",
                "params": {"name": "echo", "arguments": {"text": "hi"}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 2,
                "result": {"content": [{"type": "text", "text": "hi"}]}
            })))
            .expect(1)
            .mount(&mock)
            .await;

        let server = ServerConnection::new("demo", mock.uri(), Transport::Sse);
        let result = SseTransport::new(Client::new())
            .call_tool(&server, "echo", args(json!({"text": "hi"})), Some("s1"))
            .await;

        assert_eq!(
            result,
            ToolCallResult::success(json!({"content": [{"type": "text", "text": "hi"}]}))
        );
    }

    #[tokio::test]
    async fn test_jsonrpc_error_is_failure() {
        let mock = mock_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": {"code": -1, "message": "x"}})),
        )
        .await;

        let server = ServerConnection::new("demo", mock.uri(), Transport::HttpStreamable);
        let result = StreamableHttpTransport::new(Client::new())
            .call_tool(&server, "echo", Map::new(), None)
            .await;

        assert_eq!(result, ToolCallResult::failure(json!({"code": -1, "message": "x"})));
    }

    #[tokio::test]
    async fn test_non_200_is_http_failure() {
        let mock = mock_with(ResponseTemplate::new(503).set_body_string("overloaded")).await;

        let server = ServerConnection::new("demo", mock.uri(), Transport::Sse);
        let result = SseTransport::new(Client::new())
            .call_tool(&server, "echo", Map::new(), None)
            .await;

        assert_eq!(result, ToolCallResult::failure("HTTP 503: overloaded"));
    }

    #[tokio::test]
    async fn test_200_without_result_or_error() {
        let mock = mock_with(ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "id": 2}))).await;

        let server = ServerConnection::new("demo", mock.uri(), Transport::Sse);
        let result = SseTransport::new(Client::new())
            .call_tool(&server, "echo", Map::new(), None)
            .await;

        match result {
            ToolCallResult::Failure { error } => {
                assert!(error.as_str().unwrap().starts_with("HTTP 200: "));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_failure() {
        let mock = mock_with(ResponseTemplate::new(200).set_body_string("not json")).await;

        let server = ServerConnection::new("demo", mock.uri(), Transport::Sse);
        let result = SseTransport::new(Client::new())
            .call_tool(&server, "echo", Map::new(), None)
            .await;

        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_timeout_is_bounded_failure() {
        let mock = mock_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"result": {}}))
                .set_delay(Duration::from_secs(10)),
        )
        .await;

        let client = Client::builder().timeout(Duration::from_millis(300)).build().unwrap();
        let server = ServerConnection::new("demo", mock.uri(), Transport::HttpStreamable);

        let started = Instant::now();
        let result = StreamableHttpTransport::new(client)
            .call_tool(&server, "slow", Map::new(), None)
            .await;

        assert!(!result.is_success());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_unreachable_is_failure() {
        let server = ServerConnection::new("demo", "http://127.0.0.1:9", Transport::Sse);
        let result = SseTransport::new(Client::new())
            .call_tool(&server, "echo", Map::new(), None)
            .await;

        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_sends_auth_and_session_header() {
        let mock = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("Authorization", "Bearer sk-1"))
            .and(header("mcp-session-id", "hs-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "ok"})))
            .expect(1)
            .mount(&mock)
            .await;

        let server = ServerConnection::new("demo", mock.uri(), Transport::HttpStreamable).with_bearer("sk-1");
        let result = StreamableHttpTransport::new(Client::new())
            .call_tool(&server, "echo", Map::new(), Some("hs-9"))
            .await;

        assert_eq!(result, ToolCallResult::success(json!("ok")));
    }
}
