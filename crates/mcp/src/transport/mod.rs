//! Transports used to reach remote MCP servers.
//!
//! Each transport knows how to negotiate a session and where a session's
//! JSON-RPC messages go. Discovery and invocation are shared on top of that
//! through the provided `list_tools` / `call_tool` methods.

pub mod auth;
pub mod sse;
pub mod streamable;

pub use auth::auth_headers;
pub use sse::SseTransport;
pub use streamable::StreamableHttpTransport;

use crate::config::McpClientConfig;
use crate::error::{McpError, McpResult};
use crate::protocol::JsonRpcRequest;
use crate::{catalog, invoker};
use mcplink_core::{ServerConnection, Session, ToolCallResult, ToolDescriptor, Transport};
use reqwest::header::HeaderMap;
use reqwest::{Client, Response};
use serde_json::{Map, Value};
use url::Url;

/// Where and how to send JSON-RPC messages for one session
#[derive(Debug, Clone)]
pub struct RpcEndpoint {
    pub url: Url,
    /// Auth plus any session header
    pub headers: HeaderMap,
}

/// Failure to deliver a JSON-RPC message
#[derive(Debug, thiserror::Error)]
pub enum RpcSendError {
    #[error("Invalid MCP server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{0}")]
    Http(#[from] reqwest::Error),
}

/// Capability every transport provides
#[async_trait::async_trait]
pub trait McpTransport: Send + Sync {
    fn kind(&self) -> Transport;

    fn http(&self) -> &Client;

    /// Perform the handshake. `None` means the server is unreachable right now.
    async fn connect(&self, server: &ServerConnection) -> Option<Session>;

    /// Target for JSON-RPC messages within a session
    fn rpc_endpoint(&self, server: &ServerConnection, session_id: Option<&str>) -> Result<RpcEndpoint, url::ParseError>;

    async fn list_tools(&self, server: &ServerConnection, session_id: Option<&str>) -> Vec<ToolDescriptor> {
        catalog::list_tools(self, server, session_id).await
    }

    async fn call_tool(
        &self,
        server: &ServerConnection,
        tool_name: &str,
        arguments: Map<String, Value>,
        session_id: Option<&str>,
    ) -> ToolCallResult {
        invoker::call_tool(self, server, tool_name, arguments, session_id).await
    }
}

/// POST one JSON-RPC message to a session's endpoint
pub(crate) async fn post_rpc<T>(
    transport: &T,
    server: &ServerConnection,
    session_id: Option<&str>,
    request: &JsonRpcRequest,
) -> Result<Response, RpcSendError>
where
    T: McpTransport + ?Sized,
{
    let endpoint = transport.rpc_endpoint(server, session_id)?;
    tracing::debug!(url = %endpoint.url, method = %request.method, "POST JSON-RPC request");

    let response = transport
        .http()
        .post(endpoint.url)
        .headers(endpoint.headers)
        .json(request)
        .send()
        .await?;

    Ok(response)
}

/// Holds one implementation per transport and picks by the connection's tag
#[derive(Debug, Clone)]
pub struct McpConnector {
    sse: SseTransport,
    streamable: StreamableHttpTransport,
}

impl McpConnector {
    pub fn new(config: &McpClientConfig) -> McpResult<Self> {
        // Connections are not kept alive between calls
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(McpError::Client)?;

        Ok(Self {
            sse: SseTransport::new(client.clone()),
            streamable: StreamableHttpTransport::new(client),
        })
    }

    pub fn transport(&self, kind: Transport) -> &dyn McpTransport {
        match kind {
            Transport::Sse => &self.sse,
            Transport::HttpStreamable => &self.streamable,
        }
    }

    /// Negotiate a fresh session with a server
    pub async fn negotiate(&self, server: &ServerConnection) -> Option<Session> {
        self.transport(server.transport).connect(server).await
    }

    pub async fn list_tools(&self, server: &ServerConnection, session_id: Option<&str>) -> Vec<ToolDescriptor> {
        self.transport(server.transport).list_tools(server, session_id).await
    }

    pub async fn call_tool(
        &self,
        server: &ServerConnection,
        tool_name: &str,
        arguments: Map<String, Value>,
        session_id: Option<&str>,
    ) -> ToolCallResult {
        self.transport(server.transport)
            .call_tool(server, tool_name, arguments, session_id)
            .await
    }
}
