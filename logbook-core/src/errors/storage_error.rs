use super::error_code::{self, LogbookErrorCode};

/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("database busy: {message}")]
    Busy { message: String },

    #[error("stored row is malformed: {details}")]
    MalformedRow { details: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
}

impl LogbookErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Busy { .. } => error_code::DB_BUSY,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
