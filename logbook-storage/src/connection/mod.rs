//! Connection management: write-serialized + read-pooled.

pub mod pool;
pub mod pragmas;
pub mod writer;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use logbook_core::config::StorageConfig;
use logbook_core::errors::LogbookResult;
use rusqlite::Connection;
use tracing::info;

use self::pool::ReadPool;
use self::pragmas::apply_pragmas;
use crate::migrations::MigrationRunner;
use crate::{sqlite_err, to_storage_err};

/// Owns the single write connection and the read connection pool.
pub struct DatabaseManager {
    writer: Mutex<Connection>,
    readers: ReadPool,
    /// In-memory databases cannot share state with separate read
    /// connections, so reads go through the writer instead.
    use_read_pool: bool,
    path: Option<PathBuf>,
}

impl DatabaseManager {
    /// Open a database at the given path, apply pragmas, run migrations.
    pub fn open(path: &Path, read_pool_size: usize) -> LogbookResult<Self> {
        let writer = Connection::open(path).map_err(sqlite_err)?;
        apply_pragmas(&writer)?;
        MigrationRunner::with_registry().apply_all(&writer)?;

        let readers = ReadPool::open(path, read_pool_size)?;
        info!(path = %path.display(), readers = readers.size(), "opened logbook database");

        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            use_read_pool: true,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> LogbookResult<Self> {
        let writer = Connection::open_in_memory().map_err(sqlite_err)?;
        apply_pragmas(&writer)?;
        MigrationRunner::with_registry().apply_all(&writer)?;

        Ok(Self {
            writer: Mutex::new(writer),
            readers: ReadPool::empty(),
            use_read_pool: false,
            path: None,
        })
    }

    /// Open according to `config`: file-backed when `db_path` is set.
    pub fn open_with_config(config: &StorageConfig) -> LogbookResult<Self> {
        match &config.db_path {
            Some(path) => Self::open(Path::new(path), config.read_pool_size),
            None => Self::open_in_memory(),
        }
    }

    /// Execute a write operation with the serialized writer connection.
    pub fn with_writer<F, T>(&self, f: F) -> LogbookResult<T>
    where
        F: FnOnce(&Connection) -> LogbookResult<T>,
    {
        let guard = self
            .writer
            .lock()
            .map_err(|_| to_storage_err("write lock poisoned"))?;
        f(&guard)
    }

    /// Execute a read operation on the best available connection.
    pub fn with_reader<F, T>(&self, f: F) -> LogbookResult<T>
    where
        F: FnOnce(&Connection) -> LogbookResult<T>,
    {
        if self.use_read_pool {
            self.readers.with_conn(f)
        } else {
            self.with_writer(f)
        }
    }

    /// Get the database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
