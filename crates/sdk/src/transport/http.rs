//! HTTP transport layer for the mcplink SDK.

use crate::config::ClientConfig;
use crate::error::{McpLinkError, McpLinkResult};
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// HTTP transport for making API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> McpLinkResult<Self> {
        let mut headers = header::HeaderMap::new();

        if let Some(ref api_key) = config.api_key {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| McpLinkError::Config("Invalid API key format".to_string()))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Resolve `path` below the base URL, keeping any prefix the base carries.
    fn build_url(&self, path: &str) -> McpLinkResult<Url> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.build_segment_url(&segments)
    }

    /// Append raw segments to the base URL, percent-encoding each one.
    fn build_segment_url(&self, segments: &[&str]) -> McpLinkResult<Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| McpLinkError::Config("base_url cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send `request`, resending GETs that fail with a transient status or a timeout.
    async fn execute(&self, method: Method, request: RequestBuilder) -> McpLinkResult<Response> {
        let policy = &self.config.retry_config;
        let mut retries = 0;

        loop {
            let outcome = request
                .try_clone()
                .ok_or_else(|| McpLinkError::Config("Request body cannot be resent".to_string()))?
                .send()
                .await;

            let transient = match &outcome {
                Ok(response) if response.status().is_success() => None,
                Ok(response) if policy.is_transient(response.status().as_u16()) => {
                    Some(format!("status {}", response.status().as_u16()))
                }
                Err(e) if e.is_timeout() => Some("timeout".to_string()),
                _ => None,
            };

            match transient {
                Some(reason) if policy.may_retry(&method, retries) => {
                    let delay = policy.delay(retries);
                    retries += 1;
                    warn!(%reason, retry = retries, delay_ms = delay.as_millis() as u64, "Resending request");
                    tokio::time::sleep(delay).await;
                }
                _ => return Self::finish(outcome).await,
            }
        }
    }

    /// Turn the last attempt into the caller's result.
    async fn finish(outcome: reqwest::Result<Response>) -> McpLinkResult<Response> {
        let response = outcome?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(McpLinkError::from_response(status, &body))
    }

    async fn get_url<T: DeserializeOwned>(&self, url: Url) -> McpLinkResult<T> {
        debug!(url = %url, "GET request");

        let response = self.execute(Method::GET, self.client.get(url)).await?;
        let body = response.json().await?;
        Ok(body)
    }

    /// Execute a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> McpLinkResult<T> {
        let url = self.build_url(path)?;
        self.get_url(url).await
    }

    /// Execute a GET request against a path built from segments.
    pub async fn get_segments<T: DeserializeOwned>(&self, segments: &[&str]) -> McpLinkResult<T> {
        let url = self.build_segment_url(segments)?;
        self.get_url(url).await
    }

    /// Execute a POST request. POSTs are never retried.
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> McpLinkResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "POST request");

        let response = self.execute(Method::POST, self.client.post(url).json(body)).await?;
        let body = response.json().await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestResponse {
        message: String,
        value: i32,
    }

    #[derive(Debug, Serialize)]
    struct TestRequest {
        name: String,
    }

    fn create_config(base_url: &str, retry_config: RetryConfig) -> Arc<ClientConfig> {
        let mut config = ClientConfig::new(Url::parse(base_url).unwrap());
        config.retry_config = retry_config;
        Arc::new(config)
    }

    fn fast_retries() -> RetryConfig {
        RetryConfig {
            max_retries: 2,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            ..Default::default()
        }
    }

    fn ok_body(message: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(TestResponse {
            message: message.to_string(),
            value: 1,
        })
    }

    #[tokio::test]
    async fn test_get_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/test"))
            .respond_with(ok_body("success"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), RetryConfig::no_retry())).unwrap();

        let result: TestResponse = transport.get("/api/test").await.unwrap();
        assert_eq!(result.message, "success");
    }

    #[tokio::test]
    async fn test_post_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/create"))
            .respond_with(ok_body("created"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), RetryConfig::no_retry())).unwrap();

        let request = TestRequest {
            name: "test".to_string(),
        };
        let result: TestResponse = transport.post("/api/create", &request).await.unwrap();
        assert_eq!(result.message, "created");
    }

    #[tokio::test]
    async fn test_authorization_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/protected"))
            .and(header("Authorization", "Bearer sk-test-key"))
            .respond_with(ok_body("authorized"))
            .mount(&server)
            .await;

        let mut config = ClientConfig::new(Url::parse(&server.uri()).unwrap());
        config.api_key = Some("sk-test-key".to_string());
        let transport = HttpTransport::new(Arc::new(config)).unwrap();

        let result: TestResponse = transport.get("/api/protected").await.unwrap();
        assert_eq!(result.message, "authorized");
    }

    #[tokio::test]
    async fn test_error_on_400() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/bad"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({"error": "Bad Request"})))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), fast_retries())).unwrap();

        let result: McpLinkResult<TestResponse> = transport.get("/api/bad").await;
        match result {
            Err(McpLinkError::Api { status, message, .. }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Bad Request");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_retries_on_503() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/flaky"))
            .respond_with(ok_body("recovered"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), fast_retries())).unwrap();

        let result: TestResponse = transport.get("/api/flaky").await.unwrap();
        assert_eq!(result.message, "recovered");
    }

    #[tokio::test]
    async fn test_post_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/call"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({"error": "down"})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), fast_retries())).unwrap();

        let result: McpLinkResult<TestResponse> = transport
            .post(
                "/api/call",
                &TestRequest {
                    name: "once".to_string(),
                },
            )
            .await;
        assert_eq!(result.unwrap_err().status(), Some(503));
    }

    #[tokio::test]
    async fn test_get_segments_encodes_each_segment() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/items/a%2Fb%20c"))
            .respond_with(ok_body("encoded"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), RetryConfig::no_retry())).unwrap();

        let result: TestResponse = transport.get_segments(&["api", "items", "a/b c"]).await.unwrap();
        assert_eq!(result.message, "encoded");
    }

    #[tokio::test]
    async fn test_build_url() {
        let transport = HttpTransport::new(create_config("http://localhost:8080", RetryConfig::no_retry())).unwrap();

        let url = transport.build_url("/api/test").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/test");
    }

    #[tokio::test]
    async fn test_build_segment_url_under_prefix() {
        let transport =
            HttpTransport::new(create_config("http://localhost:8080/gateway/", RetryConfig::no_retry())).unwrap();

        let url = transport.build_segment_url(&["api", "mcp", "servers"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/gateway/api/mcp/servers");
    }

    #[tokio::test]
    async fn test_build_url_keeps_base_prefix() {
        let transport =
            HttpTransport::new(create_config("http://gw.local/mcplink/", RetryConfig::no_retry())).unwrap();

        let url = transport.build_url("/api/mcp/servers").unwrap();
        assert_eq!(url.as_str(), "http://gw.local/mcplink/api/mcp/servers");

        let url = transport.build_url("api/health").unwrap();
        assert_eq!(url.as_str(), "http://gw.local/mcplink/api/health");
    }

    #[tokio::test]
    async fn test_get_and_post_under_prefixed_base() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/mcplink/api/mcp/servers"))
            .respond_with(ok_body("listed"))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/mcplink/api/mcp/call"))
            .respond_with(ok_body("called"))
            .expect(1)
            .mount(&server)
            .await;

        let base = format!("{}/mcplink/", server.uri());
        let transport = HttpTransport::new(create_config(&base, RetryConfig::no_retry())).unwrap();

        let listed: TestResponse = transport.get("/api/mcp/servers").await.unwrap();
        assert_eq!(listed.message, "listed");

        let called: TestResponse = transport
            .post(
                "/api/mcp/call",
                &TestRequest {
                    name: "echo".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(called.message, "called");
    }

    #[tokio::test]
    async fn test_get_gives_up_after_max_retries() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/down"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({"error": "down"})))
            .expect(3)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), fast_retries())).unwrap();

        let result: McpLinkResult<TestResponse> = transport.get("/api/down").await;
        assert_eq!(result.unwrap_err().status(), Some(503));
    }
}
