//! Health API endpoint.

use crate::client::McpLinkClient;
use crate::error::McpLinkResult;
use serde::{Deserialize, Serialize};

/// Health API for checking server status.
pub struct HealthApi<'a> {
    client: &'a McpLinkClient,
}

impl<'a> HealthApi<'a> {
    pub(crate) fn new(client: &'a McpLinkClient) -> Self {
        Self { client }
    }

    /// Check basic health status.
    pub async fn check(&self) -> McpLinkResult<HealthCheck> {
        self.client.http.get("/api/health").await
    }
}

/// Basic health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub service: String,
    pub version: String,
}
