// Tool discovery (`tools/list`)

use crate::protocol::{JsonRpcRequest, JsonRpcResponse};
use crate::transport::{post_rpc, McpTransport};
use mcplink_core::{ServerConnection, ToolDescriptor};
use reqwest::StatusCode;

/// List the tools a server exposes.
///
/// Any failure (transport, non-200, unexpected body) is logged and reported
/// as an empty list.
pub async fn list_tools<T>(transport: &T, server: &ServerConnection, session_id: Option<&str>) -> Vec<ToolDescriptor>
where
    T: McpTransport + ?Sized,
{
    let response = match post_rpc(transport, server, session_id, &JsonRpcRequest::list_tools()).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Failed to get tools from MCP server {}: {}", server.name, e);
            return Vec::new();
        }
    };

    if response.status() != StatusCode::OK {
        tracing::warn!(
            server = %server.name,
            status = response.status().as_u16(),
            "tools/list returned non-200"
        );
        return Vec::new();
    }

    let body: JsonRpcResponse = match response.json().await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Failed to get tools from MCP server {}: {}", server.name, e);
            return Vec::new();
        }
    };

    match body.tools() {
        Some(tools) => tools.iter().cloned().map(ToolDescriptor).collect(),
        None => {
            tracing::warn!(server = %server.name, "tools/list response has no result.tools array");
            Vec::new()
        }
    }
}
