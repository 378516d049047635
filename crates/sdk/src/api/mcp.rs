//! MCP gateway endpoints.

use crate::client::McpLinkClient;
use crate::error::McpLinkResult;
use mcplink_core::messages::{
    ServerConnectionsConfig, ServerListResponse, ServerToolsResponse, TestConnectionReport, TestConnectionRequest,
    ToolCallRequest, ToolCallResponse,
};
use mcplink_core::ServerConnection;
use serde_json::{Map, Value};

/// MCP API for managing server connections and calling tools.
pub struct McpApi<'a> {
    client: &'a McpLinkClient,
}

impl<'a> McpApi<'a> {
    pub(crate) fn new(client: &'a McpLinkClient) -> Self {
        Self { client }
    }

    /// Get the configured connections (admin token required).
    pub async fn get_config(&self) -> McpLinkResult<Vec<ServerConnection>> {
        let response: ServerConnectionsConfig = self.client.http.get("/api/mcp/config").await?;
        Ok(response.connections)
    }

    /// Replace the configured connections (admin token required).
    ///
    /// Returns the stored list, with ids assigned to new entries.
    pub async fn update_config(&self, connections: Vec<ServerConnection>) -> McpLinkResult<Vec<ServerConnection>> {
        let request = ServerConnectionsConfig { connections };
        let response: ServerConnectionsConfig = self.client.http.post("/api/mcp/config", &request).await?;
        Ok(response.connections)
    }

    /// Check a server without registering it (admin token required).
    pub async fn test_connection(&self, request: &TestConnectionRequest) -> McpLinkResult<TestConnectionReport> {
        self.client.http.post("/api/mcp/test", request).await
    }

    /// Status of every enabled server.
    pub async fn list_servers(&self) -> McpLinkResult<ServerListResponse> {
        self.client.http.get("/api/mcp/servers").await
    }

    /// Tools exposed by one server.
    pub async fn list_server_tools(&self, server_id: &str) -> McpLinkResult<ServerToolsResponse> {
        self.client
            .http
            .get_segments(&["api", "mcp", "servers", server_id, "tools"])
            .await
    }

    /// Invoke a tool. A tool-level failure is returned in `result`, not as an error.
    pub async fn call_tool(
        &self,
        server_id: &str,
        tool_name: &str,
        arguments: Map<String, Value>,
    ) -> McpLinkResult<ToolCallResponse> {
        let request = ToolCallRequest {
            server_id: server_id.to_string(),
            tool_name: tool_name.to_string(),
            arguments,
        };
        self.client.http.post("/api/mcp/call", &request).await
    }
}
