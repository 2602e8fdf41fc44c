use serde::{Deserialize, Serialize};

use super::defaults;

/// SQLite storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file path. `None` opens an in-memory database.
    pub db_path: Option<String>,
    /// Number of read-only connections in the read pool.
    pub read_pool_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: Some(defaults::DEFAULT_DB_FILENAME.to_string()),
            read_pool_size: defaults::DEFAULT_READ_POOL_SIZE,
        }
    }
}
