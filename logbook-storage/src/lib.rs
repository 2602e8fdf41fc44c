//! # logbook-storage
//!
//! SQLite persistence for the logbook: a serialized writer plus read pool,
//! the dependency-ordered migration runner, and the queries behind
//! [`SqliteRepository`].

pub mod connection;
pub mod migrations;
pub mod queries;
pub mod repository;

pub use connection::DatabaseManager;
pub use migrations::{Migration, MigrationRunner};
pub use repository::SqliteRepository;

use logbook_core::errors::{LogbookError, StorageError};

/// Wrap a message as a storage error.
pub fn to_storage_err(message: impl Into<String>) -> LogbookError {
    StorageError::SqliteError {
        message: message.into(),
    }
    .into()
}

/// Map a rusqlite error, keeping lock contention distinguishable.
pub fn sqlite_err(e: rusqlite::Error) -> LogbookError {
    match e.sqlite_error_code() {
        Some(rusqlite::ErrorCode::DatabaseBusy) | Some(rusqlite::ErrorCode::DatabaseLocked) => {
            StorageError::Busy {
                message: e.to_string(),
            }
            .into()
        }
        _ => to_storage_err(e.to_string()),
    }
}
