use crate::types::ServerConnection;
use redb::{Database, ReadableTable, TableDefinition};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

const CONFIG_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("config");

/// Key under which the connection list is persisted
pub const CONNECTIONS_KEY: &str = "mcp.server_connections";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] redb::Error),

    #[error("failed to (de)serialize server connections: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable home of the configured connection list
pub trait ConnectionStore: Send + Sync {
    fn load(&self) -> Result<Vec<ServerConnection>, StoreError>;

    /// Replace the whole list
    fn save(&self, connections: &[ServerConnection]) -> Result<(), StoreError>;
}

/// Connection store backed by an embedded redb database
#[derive(Clone)]
pub struct RedbConnectionStore {
    db: Arc<Database>,
}

impl RedbConnectionStore {
    pub fn new(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(&path).map_err(redb::Error::from)?;

        let write_txn = db.begin_write().map_err(redb::Error::from)?;
        {
            let _config_table = write_txn
                .open_table(CONFIG_TABLE)
                .map_err(redb::Error::from)?;
        }
        write_txn.commit().map_err(redb::Error::from)?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl ConnectionStore for RedbConnectionStore {
    fn load(&self) -> Result<Vec<ServerConnection>, StoreError> {
        let read_txn = self.db.begin_read().map_err(redb::Error::from)?;
        let table = read_txn
            .open_table(CONFIG_TABLE)
            .map_err(redb::Error::from)?;

        match table.get(CONNECTIONS_KEY).map_err(redb::Error::from)? {
            Some(guard) => Ok(serde_json::from_slice(guard.value())?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, connections: &[ServerConnection]) -> Result<(), StoreError> {
        let value = serde_json::to_vec(connections)?;

        let write_txn = self.db.begin_write().map_err(redb::Error::from)?;
        {
            let mut table = write_txn
                .open_table(CONFIG_TABLE)
                .map_err(redb::Error::from)?;
            table
                .insert(CONNECTIONS_KEY, value.as_slice())
                .map_err(redb::Error::from)?;
        }
        write_txn.commit().map_err(redb::Error::from)?;

        tracing::debug!(count = connections.len(), "Persisted MCP server connections");
        Ok(())
    }
}

/// Process-local store, for tests and embedding without persistence
#[derive(Debug, Default)]
pub struct MemoryConnectionStore {
    connections: Mutex<Vec<ServerConnection>>,
}

impl MemoryConnectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connections(connections: Vec<ServerConnection>) -> Self {
        Self {
            connections: Mutex::new(connections),
        }
    }
}

impl ConnectionStore for MemoryConnectionStore {
    fn load(&self) -> Result<Vec<ServerConnection>, StoreError> {
        Ok(self
            .connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, connections: &[ServerConnection]) -> Result<(), StoreError> {
        *self.connections.lock().unwrap_or_else(PoisonError::into_inner) = connections.to_vec();
        Ok(())
    }
}
