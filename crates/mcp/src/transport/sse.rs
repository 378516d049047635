// SSE transport: handshake with `GET <url>/sse`, session id travels in the query string

use super::{auth_headers, McpTransport, RpcEndpoint};
use crate::protocol::{SSE_SESSION_HEADER, SSE_SESSION_QUERY};
use mcplink_core::{ServerConnection, Session, Transport};
use reqwest::{Client, StatusCode};
use url::Url;

#[derive(Debug, Clone)]
pub struct SseTransport {
    client: Client,
}

impl SseTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn handshake_url(server: &ServerConnection) -> Result<Url, url::ParseError> {
        Url::parse(&format!("{}/sse", server.url.trim_end_matches('/')))
    }
}

#[async_trait::async_trait]
impl McpTransport for SseTransport {
    fn kind(&self) -> Transport {
        Transport::Sse
    }

    fn http(&self) -> &Client {
        &self.client
    }

    async fn connect(&self, server: &ServerConnection) -> Option<Session> {
        let url = match Self::handshake_url(server) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Failed to connect to MCP server {}: invalid URL: {}", server.name, e);
                return None;
            }
        };

        tracing::debug!(server = %server.name, url = %url, "Opening SSE handshake");

        // Only the status line and headers matter; the event stream body is
        // never read and the connection closes when `response` drops.
        let response = match self.client.get(url).headers(auth_headers(server)).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Failed to connect to MCP server {}: {}", server.name, e);
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            tracing::warn!(
                server = %server.name,
                status = response.status().as_u16(),
                "SSE handshake rejected"
            );
            return None;
        }

        let session_id = response
            .headers()
            .get(SSE_SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Some(Session::connected(server.id.clone(), session_id, Transport::Sse))
    }

    fn rpc_endpoint(&self, server: &ServerConnection, session_id: Option<&str>) -> Result<RpcEndpoint, url::ParseError> {
        let mut url = Url::parse(&server.url)?;
        if let Some(session_id) = session_id.filter(|s| !s.is_empty()) {
            url.query_pairs_mut().append_pair(SSE_SESSION_QUERY, session_id);
        }

        Ok(RpcEndpoint {
            url,
            headers: auth_headers(server),
        })
    }
}
