use super::error_code::{self, LogbookErrorCode};

/// Failure of one enhancer on one entry.
#[derive(Debug, thiserror::Error)]
#[error("enhancer {enhancer} failed on entry {entry_id}: {reason}")]
pub struct EnhancementError {
    pub enhancer: String,
    pub entry_id: String,
    pub reason: String,
}

impl EnhancementError {
    pub fn new(
        enhancer: impl Into<String>,
        entry_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            enhancer: enhancer.into(),
            entry_id: entry_id.into(),
            reason: reason.into(),
        }
    }
}

impl LogbookErrorCode for EnhancementError {
    fn error_code(&self) -> &'static str {
        error_code::ENHANCEMENT_ERROR
    }
}
