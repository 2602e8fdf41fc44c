use super::error_code::{self, LogbookErrorCode};

/// Ingestion errors. These are transport-level: a single bad entry is
/// counted, not raised.
#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("source {source_system} is unavailable: {reason}")]
    SourceUnavailable { source_system: String, reason: String },

    #[error("entry stream from {source_system} broke: {reason}")]
    StreamFailed { source_system: String, reason: String },

    #[error("entry is missing required field {field}")]
    MissingField { field: String },
}

impl LogbookErrorCode for IngestionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SourceUnavailable { .. } => error_code::SOURCE_UNAVAILABLE,
            _ => error_code::INGESTION_ERROR,
        }
    }
}
