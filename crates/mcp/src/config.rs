//! Outbound client settings.

use std::time::Duration;

/// Settings for calls to remote MCP servers
#[derive(Debug, Clone)]
pub struct McpClientConfig {
    /// Upper bound for each negotiation, discovery or tool call
    pub request_timeout: Duration,
    /// User-Agent sent to remote servers
    pub user_agent: String,
}

impl McpClientConfig {
    pub fn with_timeout(request_timeout: Duration) -> Self {
        Self {
            request_timeout,
            ..Default::default()
        }
    }
}

impl Default for McpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            user_agent: format!("mcplink/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
