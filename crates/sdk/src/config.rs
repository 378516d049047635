//! Configuration types for the mcplink SDK.

use reqwest::Method;
use std::time::Duration;
use url::Url;

/// Configuration for the mcplink client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the mcplink server.
    pub base_url: Url,
    /// API token sent as `Authorization: Bearer <token>`.
    pub api_key: Option<String>,
    /// Request timeout. Tool calls wait on the remote server, so keep this
    /// above the server's own outbound timeout.
    pub timeout: Duration,
    pub retry_config: RetryConfig,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            timeout: Duration::from_secs(60),
            retry_config: RetryConfig::default(),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("retry_config", &self.retry_config)
            .finish()
    }
}

/// When a failed GET is sent again.
///
/// Writes are not idempotent on the gateway (a tool call may have already
/// reached the remote server), so only GETs are ever resent.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Extra attempts after the first; zero disables retrying.
    pub max_retries: u32,
    /// Wait before the first retry; doubled for each one after.
    pub base_delay: Duration,
    /// Upper bound on any single wait.
    pub max_delay: Duration,
    /// Responses with these statuses are treated as transient.
    pub transient_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            transient_statuses: vec![429, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// Send every request once.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Wait before retry number `retry` (0 for the first retry).
    pub fn delay(&self, retry: u32) -> Duration {
        2u32.checked_pow(retry)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    /// Whether a request that has already been retried `retries` times may go again
    pub fn may_retry(&self, method: &Method, retries: u32) -> bool {
        *method == Method::GET && retries < self.max_retries
    }

    pub fn is_transient(&self, status: u16) -> bool {
        self.transient_statuses.contains(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_doubles_from_base() {
        let config = RetryConfig::default();

        assert_eq!(config.delay(0), Duration::from_millis(100));
        assert_eq!(config.delay(1), Duration::from_millis(200));
        assert_eq!(config.delay(3), Duration::from_millis(800));
    }

    #[test]
    fn test_delay_is_capped() {
        let config = RetryConfig {
            max_delay: Duration::from_millis(500),
            ..Default::default()
        };

        assert_eq!(config.delay(4), Duration::from_millis(500));
        assert_eq!(config.delay(40), Duration::from_millis(500));
    }

    #[test]
    fn test_only_gets_may_retry() {
        let config = RetryConfig::default();

        assert!(config.may_retry(&Method::GET, 0));
        assert!(config.may_retry(&Method::GET, 2));
        assert!(!config.may_retry(&Method::GET, 3));
        assert!(!config.may_retry(&Method::POST, 0));
    }

    #[test]
    fn test_transient_statuses() {
        let config = RetryConfig::default();

        assert!(config.is_transient(503));
        assert!(config.is_transient(429));
        assert!(!config.is_transient(500));
        assert!(!config.is_transient(404));
    }

    #[test]
    fn test_no_retry() {
        let config = RetryConfig::no_retry();

        assert!(!config.may_retry(&Method::GET, 0));
        assert_eq!(config.base_delay, Duration::from_millis(100));
    }

    #[test]
    fn test_client_config_defaults() {
        let url = Url::parse("https://example.com").unwrap();
        let config = ClientConfig::new(url.clone());

        assert_eq!(config.base_url, url);
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.retry_config.max_retries, 3);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut config = ClientConfig::new(Url::parse("https://example.com").unwrap());
        config.api_key = Some("sk-secret".to_string());

        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
