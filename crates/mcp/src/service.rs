//! The MCP facade: what HTTP handlers call.
//!
//! Every discovery or call negotiates its own session and drops it when the
//! operation returns; no session outlives the request that created it.

use crate::config::McpClientConfig;
use crate::error::{McpError, McpResult};
use crate::transport::McpConnector;
use futures::future::join_all;
use mcplink_core::messages::{
    ServerConnectionsConfig, ServerListResponse, ServerStatusEntry, ServerToolsResponse,
    TestConnectionReport, TestConnectionRequest, ToolCallRequest, ToolCallResponse,
};
use mcplink_core::{ServerConnection, ServerRegistry, Session, SessionStatus};
use std::sync::Arc;

/// Number of tools included in a connectivity test report
pub const TOOL_PREVIEW_LIMIT: usize = 5;

pub struct McpService {
    registry: Arc<ServerRegistry>,
    connector: McpConnector,
}

impl McpService {
    pub fn new(registry: Arc<ServerRegistry>, config: &McpClientConfig) -> McpResult<Self> {
        Ok(Self {
            registry,
            connector: McpConnector::new(config)?,
        })
    }

    pub fn registry(&self) -> &Arc<ServerRegistry> {
        &self.registry
    }

    pub fn get_config(&self) -> ServerConnectionsConfig {
        ServerConnectionsConfig {
            connections: self.registry.all(),
        }
    }

    /// Replace the configured connections; returns them with ids filled in.
    ///
    /// The store commit blocks, so it runs on the blocking pool.
    pub async fn set_config(&self, config: ServerConnectionsConfig) -> McpResult<ServerConnectionsConfig> {
        let registry = self.registry.clone();
        let connections = tokio::task::spawn_blocking(move || registry.set_all(config.connections)).await??;
        Ok(ServerConnectionsConfig { connections })
    }

    /// Try a server that need not be registered
    pub async fn test_connection(&self, request: TestConnectionRequest) -> TestConnectionReport {
        let server = request.into_connection();

        if let Err(e) = server.validate() {
            return TestConnectionReport::failed(format!("Connection test failed: {}", e));
        }

        let Some(session) = self.connector.negotiate(&server).await else {
            return TestConnectionReport::failed("Failed to establish connection with MCP server");
        };

        let mut tools = self
            .connector
            .list_tools(&server, session.session_id.as_deref())
            .await;
        let tools_count = tools.len();
        tools.truncate(TOOL_PREVIEW_LIMIT);

        tracing::info!(server = %server.name, tools_count, "MCP connection test succeeded");

        TestConnectionReport {
            success: true,
            message: "Connection successful".to_string(),
            session: Some(session),
            tools_count: Some(tools_count),
            tools: Some(tools),
        }
    }

    /// Check every enabled server concurrently
    pub async fn list_connected_servers(&self) -> ServerListResponse {
        let servers = self.registry.list_enabled();
        let servers = join_all(servers.iter().map(|server| self.check_server(server))).await;
        ServerListResponse { servers }
    }

    async fn check_server(&self, server: &ServerConnection) -> ServerStatusEntry {
        let disconnected = || ServerStatusEntry {
            id: server.id.clone(),
            name: server.name.clone(),
            status: SessionStatus::Disconnected,
            tools_count: 0,
            session_id: None,
            transport: server.transport,
        };

        if let Err(e) = server.validate() {
            tracing::warn!(server = %server.name, "Skipping misconfigured MCP server: {}", e);
            return disconnected();
        }

        match self.connector.negotiate(server).await {
            Some(session) => {
                let tools = self
                    .connector
                    .list_tools(server, session.session_id.as_deref())
                    .await;
                ServerStatusEntry {
                    id: server.id.clone(),
                    name: server.name.clone(),
                    status: SessionStatus::Connected,
                    tools_count: tools.len(),
                    session_id: session.session_id,
                    transport: server.transport,
                }
            }
            None => disconnected(),
        }
    }

    pub async fn list_server_tools(&self, server_id: &str) -> McpResult<ServerToolsResponse> {
        let (server, session) = self.open(server_id).await?;

        let tools = self
            .connector
            .list_tools(&server, session.session_id.as_deref())
            .await;

        Ok(ServerToolsResponse {
            server_id: server.id,
            server_name: server.name,
            session_id: session.session_id,
            tools,
        })
    }

    pub async fn call_tool(&self, request: ToolCallRequest) -> McpResult<ToolCallResponse> {
        let (server, session) = self.open(&request.server_id).await?;

        tracing::info!(server = %server.name, tool = %request.tool_name, "Calling MCP tool");

        let result = self
            .connector
            .call_tool(
                &server,
                &request.tool_name,
                request.arguments,
                session.session_id.as_deref(),
            )
            .await;

        Ok(ToolCallResponse {
            server_id: request.server_id,
            tool_name: request.tool_name,
            result,
        })
    }

    /// Resolve an enabled server and negotiate a session for this call only
    async fn open(&self, server_id: &str) -> McpResult<(ServerConnection, Session)> {
        let server = self
            .registry
            .get_enabled(server_id)
            .ok_or_else(|| McpError::NotFound(server_id.to_string()))?;

        server.validate()?;

        let session = self
            .connector
            .negotiate(&server)
            .await
            .ok_or_else(|| McpError::Unreachable(server.name.clone()))?;

        Ok((server, session))
    }
}
