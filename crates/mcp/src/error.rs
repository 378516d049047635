//! Errors surfaced by the MCP facade.
//!
//! Remote-server failures never show up here: the negotiator, catalog and
//! invoker turn them into `None`, empty lists or `ToolCallResult::Failure`.

use mcplink_core::{ConnectionConfigError, RegistryError, StoreError};

pub type McpResult<T> = Result<T, McpError>;

#[derive(Debug, thiserror::Error)]
pub enum McpError {
    /// Unknown or disabled server id
    #[error("MCP server not found: {0}")]
    NotFound(String),

    /// Negotiation failed (connect error, timeout or non-200 handshake)
    #[error("Failed to connect to MCP server: {0}")]
    Unreachable(String),

    /// Incomplete connection policy, e.g. header auth without a header name
    #[error(transparent)]
    Configuration(#[from] ConnectionConfigError),

    /// Two connections in one configuration share an id
    #[error("MCP server id '{0}' is used by more than one connection")]
    DuplicateId(String),

    /// Persisting the connection list failed
    #[error("Failed to store MCP server connections: {0}")]
    Storage(#[from] StoreError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// A blocking store write panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<RegistryError> for McpError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(id) => Self::NotFound(id),
            RegistryError::DuplicateId(id) => Self::DuplicateId(id),
            RegistryError::Store(e) => Self::Storage(e),
        }
    }
}
