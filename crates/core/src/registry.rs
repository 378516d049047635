use crate::store::{ConnectionStore, StoreError};
use crate::types::ServerConnection;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Environment variable that may seed an empty store with a JSON array of connections
pub const SEED_ENV_VAR: &str = "MCP_SERVER_CONNECTIONS";

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("MCP server not found: {0}")]
    NotFound(String),

    #[error("MCP server id '{0}' is used by more than one connection")]
    DuplicateId(String),

    #[error("connection store error: {0}")]
    Store(#[from] StoreError),
}

/// Immutable view of the registry, published whole on every write
#[derive(Debug, Default)]
pub struct RegistrySnapshot {
    connections: Vec<ServerConnection>,
    enabled: HashMap<String, ServerConnection>,
}

impl RegistrySnapshot {
    fn build(connections: Vec<ServerConnection>) -> Self {
        let enabled = connections
            .iter()
            .filter(|c| c.enabled)
            .map(|c| (c.id.clone(), c.clone()))
            .collect();

        Self { connections, enabled }
    }

    /// All configured connections, in configuration order
    pub fn connections(&self) -> &[ServerConnection] {
        &self.connections
    }

    pub fn get(&self, id: &str) -> Option<&ServerConnection> {
        self.connections.iter().find(|c| c.id == id)
    }

    pub fn get_enabled(&self, id: &str) -> Option<&ServerConnection> {
        self.enabled.get(id)
    }

    /// Enabled connections, in configuration order
    pub fn enabled(&self) -> impl Iterator<Item = &ServerConnection> {
        self.connections.iter().filter(|c| c.enabled)
    }
}

/// Mapping from server id to connection, backed by a durable store.
///
/// Readers take a cheap clone of the current snapshot. `set_all` holds the
/// writer lock while it persists and then swaps in a new snapshot, so a
/// reader sees either the old list or the new one and nothing in between.
pub struct ServerRegistry {
    store: Arc<dyn ConnectionStore>,
    snapshot: RwLock<Arc<RegistrySnapshot>>,
    writer: Mutex<()>,
}

impl ServerRegistry {
    /// Build the registry from whatever the store currently holds
    pub fn load(store: Arc<dyn ConnectionStore>) -> Result<Self, RegistryError> {
        let mut connections = store.load()?;
        let assigned = assign_ids(&mut connections);

        if assigned > 0 {
            tracing::info!(assigned, "Assigned ids to stored MCP server connections");
            store.save(&connections)?;
        }

        tracing::info!(
            total = connections.len(),
            enabled = connections.iter().filter(|c| c.enabled).count(),
            "Loaded MCP server registry"
        );

        Ok(Self {
            store,
            snapshot: RwLock::new(Arc::new(RegistrySnapshot::build(connections))),
            writer: Mutex::new(()),
        })
    }

    /// Seed an empty registry from a JSON array of connections.
    ///
    /// Does nothing when connections are already configured. Malformed JSON
    /// is logged and ignored.
    pub fn seed_from_json(&self, raw: &str) -> Result<usize, RegistryError> {
        if !self.snapshot().connections().is_empty() {
            return Ok(0);
        }

        let connections: Vec<ServerConnection> = match serde_json::from_str(raw) {
            Ok(connections) => connections,
            Err(e) => {
                tracing::error!("Error loading {}: {}", SEED_ENV_VAR, e);
                return Ok(0);
            }
        };

        if connections.is_empty() {
            return Ok(0);
        }

        let stored = match self.set_all(connections) {
            Ok(stored) => stored,
            Err(RegistryError::DuplicateId(id)) => {
                tracing::error!("Error loading {}: duplicate id {}", SEED_ENV_VAR, id);
                return Ok(0);
            }
            Err(e) => return Err(e),
        };
        tracing::info!(count = stored.len(), "Seeded MCP server registry from {}", SEED_ENV_VAR);
        Ok(stored.len())
    }

    /// Seed from the `MCP_SERVER_CONNECTIONS` environment variable, if set
    pub fn seed_from_env(&self) -> Result<usize, RegistryError> {
        match std::env::var(SEED_ENV_VAR) {
            Ok(raw) => self.seed_from_json(&raw),
            Err(_) => Ok(0),
        }
    }

    /// Replace the whole configuration, assigning ids where missing
    pub fn set_all(&self, mut connections: Vec<ServerConnection>) -> Result<Vec<ServerConnection>, RegistryError> {
        ensure_unique_ids(&connections)?;

        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let assigned = assign_ids(&mut connections);
        self.store.save(&connections)?;

        let next = Arc::new(RegistrySnapshot::build(connections.clone()));
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = next;

        tracing::info!(
            total = connections.len(),
            assigned,
            "Updated MCP server connections"
        );

        Ok(connections)
    }

    /// Current snapshot; stays valid even if a writer replaces it meanwhile
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn all(&self) -> Vec<ServerConnection> {
        self.snapshot().connections().to_vec()
    }

    pub fn get(&self, id: &str) -> Result<ServerConnection, RegistryError> {
        self.snapshot()
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// Routing lookup: only enabled servers are returned
    pub fn get_enabled(&self, id: &str) -> Option<ServerConnection> {
        self.snapshot().get_enabled(id).cloned()
    }

    pub fn list_enabled(&self) -> Vec<ServerConnection> {
        self.snapshot().enabled().cloned().collect()
    }
}

/// Explicit ids must be unique; empty ids are filled in later
fn ensure_unique_ids(connections: &[ServerConnection]) -> Result<(), RegistryError> {
    let mut seen = HashSet::new();
    for conn in connections.iter().filter(|c| c.has_id()) {
        if !seen.insert(conn.id.as_str()) {
            return Err(RegistryError::DuplicateId(conn.id.clone()));
        }
    }
    Ok(())
}

/// Give every connection without an id a fresh one; returns how many were assigned
fn assign_ids(connections: &mut [ServerConnection]) -> usize {
    let mut assigned = 0;
    for conn in connections.iter_mut().filter(|c| !c.has_id()) {
        conn.id = format!("mcp_{}", uuid::Uuid::new_v4().simple());
        assigned += 1;
    }
    assigned
}
