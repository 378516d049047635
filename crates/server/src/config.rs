use anyhow::{Context, Result};
use mcplink_core::{CallerAuthorizer, ConnectionStore, RedbConnectionStore, ServerRegistry, StaticTokenAuthorizer};
use mcplink_mcp::{McpClientConfig, McpService};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(skip)]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub mcp: McpConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_index_file")]
    pub index_file: String,
}

fn default_index_file() -> String {
    "mcplink.redb".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            index_file: default_index_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpConfig {
    /// Bound on every outbound request to a remote MCP server
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// API tokens accepted in `Authorization: Bearer <token>`
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub admin_tokens: Vec<String>,

    #[serde(default)]
    pub user_tokens: Vec<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("admin_tokens", &self.admin_tokens.len())
            .field("user_tokens", &self.user_tokens.len())
            .finish()
    }
}

impl ServerConfig {
    pub fn load(config_path: &Path, data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

        // Load config file if it exists, otherwise use defaults
        let mut config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(config_path).context("Failed to read configuration file")?;
            toml::from_str(&content).context("Failed to parse configuration file")?
        } else {
            tracing::info!("Configuration file not found, using defaults");
            Self::default()
        };

        config.data_dir = data_dir;

        if config.auth.admin_tokens.is_empty() && config.auth.user_tokens.is_empty() {
            tracing::warn!("No API tokens configured; every /api/mcp request will be rejected");
        }

        Ok(config)
    }

    /// Get the connection store path
    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join(&self.storage.index_file)
    }

    pub fn mcp_client_config(&self) -> McpClientConfig {
        McpClientConfig::with_timeout(Duration::from_secs(self.mcp.request_timeout_secs))
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ServerRegistry>,
    pub mcp: Arc<McpService>,
    pub authorizer: Arc<dyn CallerAuthorizer>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let store: Arc<dyn ConnectionStore> = Arc::new(
            RedbConnectionStore::new(config.index_path()).context("Failed to open connection store")?,
        );

        let registry = Arc::new(ServerRegistry::load(store).context("Failed to load MCP server connections")?);
        let seeded = registry
            .seed_from_env()
            .context("Failed to seed MCP server connections")?;
        if seeded == 0 {
            tracing::info!(count = registry.all().len(), "Loaded MCP server connections");
        }

        let authorizer = Arc::new(StaticTokenAuthorizer::from_tokens(
            &config.auth.admin_tokens,
            &config.auth.user_tokens,
        ));

        Self::from_parts(registry, authorizer, &config.mcp_client_config())
    }

    pub fn from_parts(
        registry: Arc<ServerRegistry>,
        authorizer: Arc<dyn CallerAuthorizer>,
        client_config: &McpClientConfig,
    ) -> Result<Self> {
        let mcp = Arc::new(
            McpService::new(registry.clone(), client_config).context("Failed to create MCP service")?,
        );

        Ok(Self {
            registry,
            mcp,
            authorizer,
        })
    }
}
