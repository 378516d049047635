use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Classification of an authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerRole {
    Admin,
    User,
}

/// Minimum classification an operation requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// Configuration reads/writes and connectivity tests
    Admin,
    /// Server listing, tool discovery and tool calls
    Verified,
}

impl CallerRole {
    /// Admins can do anything a verified user can
    pub fn satisfies(&self, access: Access) -> bool {
        match access {
            Access::Admin => *self == CallerRole::Admin,
            Access::Verified => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    #[error("Missing or malformed credentials")]
    Unauthenticated,

    #[error("Caller is not allowed to perform this operation")]
    Forbidden,
}

/// Decides who a bearer token belongs to
pub trait CallerAuthorizer: Send + Sync {
    /// `None` for unknown tokens
    fn classify(&self, token: &str) -> Option<CallerRole>;

    fn authorize(&self, token: Option<&str>, access: Access) -> Result<CallerRole, AuthzError> {
        let role = token
            .filter(|t| !t.is_empty())
            .and_then(|t| self.classify(t))
            .ok_or(AuthzError::Unauthenticated)?;

        if role.satisfies(access) {
            Ok(role)
        } else {
            Err(AuthzError::Forbidden)
        }
    }
}

/// Token table loaded from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticTokenAuthorizer {
    tokens: HashMap<String, CallerRole>,
}

impl StaticTokenAuthorizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tokens(admin_tokens: &[String], user_tokens: &[String]) -> Self {
        let mut authorizer = Self::new();
        for token in user_tokens {
            authorizer.register(token.clone(), CallerRole::User);
        }
        // Admin wins if a token is listed twice
        for token in admin_tokens {
            authorizer.register(token.clone(), CallerRole::Admin);
        }
        authorizer
    }

    pub fn register(&mut self, token: String, role: CallerRole) {
        if token.is_empty() {
            tracing::warn!("Ignoring empty API token in configuration");
            return;
        }
        self.tokens.insert(token, role);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl CallerAuthorizer for StaticTokenAuthorizer {
    fn classify(&self, token: &str) -> Option<CallerRole> {
        self.tokens.get(token).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authorizer() -> StaticTokenAuthorizer {
        StaticTokenAuthorizer::from_tokens(&["admin-token".to_string()], &["user-token".to_string()])
    }

    #[test]
    fn test_role_satisfies() {
        assert!(CallerRole::Admin.satisfies(Access::Admin));
        assert!(CallerRole::Admin.satisfies(Access::Verified));
        assert!(CallerRole::User.satisfies(Access::Verified));
        assert!(!CallerRole::User.satisfies(Access::Admin));
    }

    #[test]
    fn test_classify() {
        let authz = authorizer();

        assert_eq!(authz.classify("admin-token"), Some(CallerRole::Admin));
        assert_eq!(authz.classify("user-token"), Some(CallerRole::User));
        assert_eq!(authz.classify("stranger"), None);
    }

    #[test]
    fn test_authorize() {
        let authz = authorizer();

        assert_eq!(authz.authorize(Some("admin-token"), Access::Admin), Ok(CallerRole::Admin));
        assert_eq!(authz.authorize(Some("user-token"), Access::Verified), Ok(CallerRole::User));
        assert_eq!(authz.authorize(Some("user-token"), Access::Admin), Err(AuthzError::Forbidden));
        assert_eq!(authz.authorize(Some("stranger"), Access::Verified), Err(AuthzError::Unauthenticated));
        assert_eq!(authz.authorize(None, Access::Verified), Err(AuthzError::Unauthenticated));
        assert_eq!(authz.authorize(Some(""), Access::Verified), Err(AuthzError::Unauthenticated));
    }

    #[test]
    fn test_admin_wins_on_duplicate_token() {
        let authz = StaticTokenAuthorizer::from_tokens(&["shared".to_string()], &["shared".to_string()]);
        assert_eq!(authz.classify("shared"), Some(CallerRole::Admin));
    }

    #[test]
    fn test_empty_tokens_ignored() {
        let authz = StaticTokenAuthorizer::from_tokens(&[String::new()], &[]);
        assert!(authz.is_empty());
    }
}
