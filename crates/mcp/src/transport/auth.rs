// Outbound authentication headers for remote MCP servers

use mcplink_core::{AuthType, ServerConnection};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};

/// Build the auth headers for a server's policy.
///
/// Never fails: a policy missing its key or header name, or one whose values
/// are not valid HTTP header text, yields no auth header at all. The key is
/// never logged.
pub fn auth_headers(server: &ServerConnection) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let key = server.auth_key.as_deref().filter(|k| !k.is_empty());

    match server.auth_type {
        AuthType::None => {}
        AuthType::Bearer => match key {
            Some(key) => match sensitive_value(&format!("Bearer {}", key)) {
                Some(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                None => tracing::warn!(server = %server.name, "Bearer token is not a valid header value; sending no auth"),
            },
            None => tracing::warn!(server = %server.name, "Bearer auth configured without a key; sending no auth"),
        },
        AuthType::Header => {
            let name = server
                .auth_header_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty());

            match (name, key) {
                (Some(name), Some(key)) => {
                    match (HeaderName::from_bytes(name.as_bytes()), sensitive_value(key)) {
                        (Ok(name), Some(value)) => {
                            headers.insert(name, value);
                        }
                        _ => tracing::warn!(
                            server = %server.name,
                            header = name,
                            "Auth header is not valid HTTP header text; sending no auth"
                        ),
                    }
                }
                _ => tracing::warn!(
                    server = %server.name,
                    "Header auth needs both auth_header_name and auth_key; sending no auth"
                ),
            }
        }
    }

    headers
}

fn sensitive_value(text: &str) -> Option<HeaderValue> {
    let mut value = HeaderValue::from_str(text).ok()?;
    value.set_sensitive(true);
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcplink_core::Transport;

    fn server() -> ServerConnection {
        ServerConnection::new("demo", "http://x", Transport::Sse)
    }

    #[test]
    fn test_none_is_empty() {
        assert!(auth_headers(&server()).is_empty());
    }

    #[test]
    fn test_none_ignores_stray_key() {
        let mut conn = server();
        conn.auth_key = Some("leftover".to_string());
        assert!(auth_headers(&conn).is_empty());
    }

    #[test]
    fn test_bearer() {
        let headers = auth_headers(&server().with_bearer("sk-1"));

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer sk-1");
        assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
    }

    #[test]
    fn test_bearer_without_key() {
        let mut conn = server().with_bearer("");
        assert!(auth_headers(&conn).is_empty());

        conn.auth_key = None;
        assert!(auth_headers(&conn).is_empty());
    }

    #[test]
    fn test_custom_header() {
        let headers = auth_headers(&server().with_header_auth("X-Api-Key", "k-1"));

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("x-api-key").unwrap(), "k-1");
    }

    #[test]
    fn test_custom_header_without_name_emits_nothing() {
        let mut conn = server().with_header_auth("", "k-1");
        assert!(auth_headers(&conn).is_empty());

        conn.auth_header_name = None;
        assert!(auth_headers(&conn).is_empty());
    }

    #[test]
    fn test_custom_header_without_key_emits_nothing() {
        let mut conn = server().with_header_auth("X-Api-Key", "");
        assert!(auth_headers(&conn).is_empty());

        conn.auth_key = None;
        assert!(auth_headers(&conn).is_empty());
    }

    #[test]
    fn test_invalid_header_name_emits_nothing() {
        let conn = server().with_header_auth("Bad Header", "k-1");
        assert!(auth_headers(&conn).is_empty());
    }

    #[test]
    fn test_invalid_header_value_emits_nothing() {
        let conn = server().with_bearer("line\nbreak");
        assert!(auth_headers(&conn).is_empty());
    }
}
