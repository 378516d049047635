use super::ApiResult;
use crate::config::AppState;
use crate::middleware::auth::{AdminCaller, VerifiedCaller};
use axum::{
    extract::{Path, State},
    Json,
};
use mcplink_core::messages::{
    ServerConnectionsConfig, ServerListResponse, ServerToolsResponse, TestConnectionReport, TestConnectionRequest,
    ToolCallRequest, ToolCallResponse,
};
use std::sync::Arc;

/// Read the full connection list
pub async fn get_config(_caller: AdminCaller, State(state): State<Arc<AppState>>) -> Json<ServerConnectionsConfig> {
    Json(state.mcp.get_config())
}

/// Replace the connection list; the response carries the assigned ids
pub async fn update_config(
    _caller: AdminCaller,
    State(state): State<Arc<AppState>>,
    Json(config): Json<ServerConnectionsConfig>,
) -> ApiResult<Json<ServerConnectionsConfig>> {
    let saved = state.mcp.set_config(config).await?;
    tracing::info!(count = saved.connections.len(), "Updated MCP server connections");
    Ok(Json(saved))
}

/// Check a server that need not be registered
pub async fn test_connection(
    _caller: AdminCaller,
    State(state): State<Arc<AppState>>,
    Json(req): Json<TestConnectionRequest>,
) -> Json<TestConnectionReport> {
    Json(state.mcp.test_connection(req).await)
}

/// Status and tool count of every enabled server
pub async fn list_servers(_caller: VerifiedCaller, State(state): State<Arc<AppState>>) -> Json<ServerListResponse> {
    Json(state.mcp.list_connected_servers().await)
}

pub async fn list_server_tools(
    _caller: VerifiedCaller,
    State(state): State<Arc<AppState>>,
    Path(server_id): Path<String>,
) -> ApiResult<Json<ServerToolsResponse>> {
    let response = state.mcp.list_server_tools(&server_id).await?;
    Ok(Json(response))
}

pub async fn call_tool(
    _caller: VerifiedCaller,
    State(state): State<Arc<AppState>>,
    Json(req): Json<ToolCallRequest>,
) -> ApiResult<Json<ToolCallResponse>> {
    let response = state.mcp.call_tool(req).await?;
    Ok(Json(response))
}
