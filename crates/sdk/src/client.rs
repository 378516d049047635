//! Main client for the mcplink SDK.

use crate::api::{HealthApi, McpApi};
use crate::config::{ClientConfig, RetryConfig};
use crate::error::{McpLinkError, McpLinkResult};
use crate::transport::HttpTransport;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Client for the mcplink HTTP API.
#[derive(Debug, Clone)]
pub struct McpLinkClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl McpLinkClient {
    /// Create a new client builder.
    pub fn builder() -> McpLinkClientBuilder {
        McpLinkClientBuilder::new()
    }

    fn from_config(config: ClientConfig) -> McpLinkResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the health API.
    pub fn health(&self) -> HealthApi<'_> {
        HealthApi::new(self)
    }

    /// Get the MCP API.
    pub fn mcp(&self) -> McpApi<'_> {
        McpApi::new(self)
    }
}

/// Builder for creating an McpLinkClient.
pub struct McpLinkClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
    retry_config: RetryConfig,
}

impl McpLinkClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout: None,
            retry_config: RetryConfig::default(),
        }
    }

    /// Set the base URL of the mcplink server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API token for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Build the client.
    pub fn build(self) -> McpLinkResult<McpLinkClient> {
        let base_url_str = self
            .base_url
            .ok_or_else(|| McpLinkError::Config("base_url is required".to_string()))?;

        let mut config = ClientConfig::new(Url::parse(&base_url_str)?);
        config.api_key = self.api_key;
        config.retry_config = self.retry_config;
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }

        McpLinkClient::from_config(config)
    }
}

impl Default for McpLinkClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
