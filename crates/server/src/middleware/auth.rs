use crate::api::ApiError;
use crate::config::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use mcplink_core::{Access, CallerRole};
use std::sync::Arc;

/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth_header = headers.get(AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authorize(parts: &Parts, state: &AppState, access: Access) -> Result<CallerRole, ApiError> {
    let token = bearer_token(&parts.headers);

    state.authorizer.authorize(token, access).map_err(|e| {
        tracing::debug!(path = %parts.uri.path(), ?access, "Rejected request: {}", e);
        ApiError::from(e)
    })
}

/// Caller allowed to read and change configuration
#[derive(Debug, Clone, Copy)]
pub struct AdminCaller(pub CallerRole);

impl FromRequestParts<Arc<AppState>> for AdminCaller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        authorize(parts, state, Access::Admin).map(Self)
    }
}

/// Any authenticated caller
#[derive(Debug, Clone, Copy)]
pub struct VerifiedCaller(pub CallerRole);

impl FromRequestParts<Arc<AppState>> for VerifiedCaller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        authorize(parts, state, Access::Verified).map(Self)
    }
}
