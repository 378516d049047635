//! Error types for the mcplink SDK.

use serde::{Deserialize, Serialize};

/// Result type for SDK operations.
pub type McpLinkResult<T> = Result<T, McpLinkError>;

/// Error types that can occur when using the mcplink SDK.
#[derive(Debug, thiserror::Error)]
pub enum McpLinkError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<String>,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl McpLinkError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Unknown or disabled MCP server
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The remote MCP server could not be reached
    pub fn is_unreachable(&self) -> bool {
        self.status() == Some(503)
    }

    /// Create an API error from a status code and response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(error_response) => Self::Api {
                status,
                message: error_response.error,
                details: error_response.details,
            },
            Err(_) => Self::Api {
                status,
                message: body.to_string(),
                details: None,
            },
        }
    }
}

/// Error body returned by the mcplink server.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
