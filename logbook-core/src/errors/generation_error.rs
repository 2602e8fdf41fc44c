use super::error_code::{self, LogbookErrorCode};

/// Text-generation collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("text generation request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("text generation returned an empty completion")]
    EmptyCompletion,

    #[error("model {model} is not available")]
    ModelUnavailable { model: String },
}

impl LogbookErrorCode for GenerationError {
    fn error_code(&self) -> &'static str {
        error_code::GENERATION_ERROR
    }
}
