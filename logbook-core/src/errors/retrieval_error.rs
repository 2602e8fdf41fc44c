use super::error_code::{self, LogbookErrorCode};

/// Retrieval subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("retriever {retriever} failed: {reason}")]
    SearchFailed { retriever: String, reason: String },

    #[error("retriever {retriever} returned an item tagged with source {found}")]
    InconsistentSource { retriever: String, found: String },

    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },
}

impl LogbookErrorCode for RetrievalError {
    fn error_code(&self) -> &'static str {
        error_code::RETRIEVAL_ERROR
    }
}
