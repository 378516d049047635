use crate::config::{AppState, ServerConfig};
use anyhow::Result;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use mcplink_core::AuthzError;
use mcplink_mcp::McpError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

mod handlers;

/// Start the API server
pub async fn serve(addr: &str, config: ServerConfig) -> Result<()> {
    let state = AppState::new(&config)?;

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the API router
pub(crate) fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        // Admin routes
        .route(
            "/api/mcp/config",
            get(handlers::get_config).post(handlers::update_config),
        )
        .route("/api/mcp/test", post(handlers::test_connection))
        // Verified-user routes
        .route("/api/mcp/servers", get(handlers::list_servers))
        .route("/api/mcp/servers/{server_id}/tools", get(handlers::list_server_tools))
        .route("/api/mcp/call", post(handlers::call_tool))
        // Middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        )
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "mcplink",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// Error type for API handlers
#[derive(Debug)]
pub enum ApiError {
    Authz(AuthzError),
    Mcp(McpError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Authz(AuthzError::Unauthenticated) => StatusCode::UNAUTHORIZED,
            Self::Authz(AuthzError::Forbidden) => StatusCode::FORBIDDEN,
            Self::Mcp(McpError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Mcp(McpError::Unreachable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Mcp(McpError::Configuration(_) | McpError::DuplicateId(_)) => StatusCode::BAD_REQUEST,
            Self::Mcp(McpError::Storage(_) | McpError::Client(_) | McpError::Task(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let response = match &self {
            Self::Authz(e) => ErrorResponse::new(e.to_string()),
            Self::Mcp(McpError::NotFound(_)) => ErrorResponse::new("MCP server not found"),
            Self::Mcp(McpError::Unreachable(_)) => ErrorResponse::new("Failed to connect to MCP server"),
            Self::Mcp(e @ (McpError::Configuration(_) | McpError::DuplicateId(_))) => {
                ErrorResponse::with_details("Invalid MCP server configuration", e.to_string())
            }
            // Internal detail stays in the log
            Self::Mcp(e) => {
                tracing::error!("Internal error handling MCP request: {}", e);
                ErrorResponse::new("Internal server error")
            }
        };

        (status, Json(response)).into_response()
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        Self::Authz(err)
    }
}

impl From<McpError> for ApiError {
    fn from(err: McpError) -> Self {
        Self::Mcp(err)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
