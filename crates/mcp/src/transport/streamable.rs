// Streamable HTTP transport: handshake with `POST <url>` and body `{}`,
// session id travels in the `mcp-session-id` header

use super::{auth_headers, McpTransport, RpcEndpoint};
use crate::protocol::MCP_SESSION_HEADER;
use mcplink_core::{ServerConnection, Session, Transport};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use url::Url;

#[derive(Debug, Clone)]
pub struct StreamableHttpTransport {
    client: Client,
}

impl StreamableHttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl McpTransport for StreamableHttpTransport {
    fn kind(&self) -> Transport {
        Transport::HttpStreamable
    }

    fn http(&self) -> &Client {
        &self.client
    }

    async fn connect(&self, server: &ServerConnection) -> Option<Session> {
        let url = match Url::parse(&server.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Failed to connect to MCP server {}: invalid URL: {}", server.name, e);
                return None;
            }
        };

        tracing::debug!(server = %server.name, url = %url, "Opening streamable HTTP handshake");

        let response = match self
            .client
            .post(url)
            .headers(auth_headers(server))
            .json(&serde_json::json!({}))
            .send()
            .await
        {
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
                "Streamable HTTP handshake rejected"
            );
            return None;
        }

        let session_id = response
            .headers()
            .get(MCP_SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Some(Session::connected(server.id.clone(), session_id, Transport::HttpStreamable))
    }

    fn rpc_endpoint(&self, server: &ServerConnection, session_id: Option<&str>) -> Result<RpcEndpoint, url::ParseError> {
        let url = Url::parse(&server.url)?;
        let mut headers = auth_headers(server);

        if let Some(session_id) = session_id.filter(|s| !s.is_empty()) {
            match HeaderValue::from_str(session_id) {
                Ok(value) => {
                    headers.insert(HeaderName::from_static(MCP_SESSION_HEADER), value);
                }
                Err(_) => tracing::warn!(server = %server.name, "Session id is not a valid header value; sending without it"),
            }
        }

        Ok(RpcEndpoint { url, headers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport() -> StreamableHttpTransport {
        StreamableHttpTransport::new(Client::new())
    }

    #[test]
    fn test_rpc_endpoint_puts_session_in_header() {
        let server = ServerConnection::new("demo", "http://x/mcp", Transport::HttpStreamable)
            .with_header_auth("X-Api-Key", "k");
        let endpoint = transport().rpc_endpoint(&server, Some("abc")).unwrap();

        assert_eq!(endpoint.url.as_str(), "http://x/mcp");
        assert_eq!(endpoint.headers.get("mcp-session-id").unwrap(), "abc");
        assert_eq!(endpoint.headers.get("x-api-key").unwrap(), "k");
    }

    #[test]
    fn test_rpc_endpoint_without_session() {
        let server = ServerConnection::new("demo", "http://x/mcp", Transport::HttpStreamable);
        let endpoint = transport().rpc_endpoint(&server, None).unwrap();

        assert!(endpoint.headers.is_empty());
    }

    #[tokio::test]
    async fn test_connect_posts_empty_object() {
        let mock = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_json(serde_json::json!({})))
            .respond_with(ResponseTemplate::new(200).insert_header("mcp-session-id", "hs-1"))
            .expect(1)
            .mount(&mock)
            .await;

        let server = ServerConnection::new("demo", mock.uri(), Transport::HttpStreamable).with_id("srv");
        let session = transport().connect(&server).await.unwrap();

        assert_eq!(
            session,
            Session::connected("srv", Some("hs-1".to_string()), Transport::HttpStreamable)
        );
    }

    #[tokio::test]
    async fn test_connect_sends_custom_auth_header() {
        let mock = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("X-Api-Key", "k-1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock)
            .await;

        let server = ServerConnection::new("demo", mock.uri(), Transport::HttpStreamable)
            .with_header_auth("X-Api-Key", "k-1");

        assert!(transport().connect(&server).await.is_some());
    }

    #[tokio::test]
    async fn test_connect_non_200_is_none() {
        let mock = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&mock)
            .await;

        let server = ServerConnection::new("demo", mock.uri(), Transport::HttpStreamable);
        assert!(transport().connect(&server).await.is_none());
    }
}
