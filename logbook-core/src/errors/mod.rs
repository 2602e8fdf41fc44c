//! Error handling for the logbook workspace.
//! One error enum per subsystem, `thiserror` only, aggregated into `LogbookError`.

pub mod config_error;
pub mod enhancement_error;
pub mod error_code;
pub mod generation_error;
pub mod ingestion_error;
pub mod migration_error;
pub mod pipeline_error;
pub mod retrieval_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use enhancement_error::EnhancementError;
pub use error_code::LogbookErrorCode;
pub use generation_error::GenerationError;
pub use ingestion_error::IngestionError;
pub use migration_error::MigrationError;
pub use pipeline_error::{PipelineError, PipelineStage};
pub use retrieval_error::RetrievalError;
pub use storage_error::StorageError;

/// Top-level error for every fallible operation in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum LogbookError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Migration(#[from] MigrationError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error(transparent)]
    Enhancement(#[from] EnhancementError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl LogbookErrorCode for LogbookError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(e) => e.error_code(),
            Self::Migration(e) => e.error_code(),
            Self::Retrieval(e) => e.error_code(),
            Self::Generation(e) => e.error_code(),
            Self::Ingestion(e) => e.error_code(),
            Self::Enhancement(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Pipeline(e) => e.error_code(),
        }
    }
}

pub type LogbookResult<T> = Result<T, LogbookError>;
