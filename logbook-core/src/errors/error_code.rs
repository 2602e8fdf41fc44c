//! Stable error codes attached to log records.

/// Every error enum exposes a stable `SCREAMING_CASE` code so that logs and
/// metrics can group failures without parsing messages.
pub trait LogbookErrorCode {
    fn error_code(&self) -> &'static str;

    /// `[CODE] message`, used as the `error` field in structured logs.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const DB_BUSY: &str = "DB_BUSY";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const MIGRATION_CONFIG: &str = "MIGRATION_CONFIG";
pub const ROLLBACK_UNSUPPORTED: &str = "ROLLBACK_UNSUPPORTED";
pub const RETRIEVAL_ERROR: &str = "RETRIEVAL_ERROR";
pub const GENERATION_ERROR: &str = "GENERATION_ERROR";
pub const INGESTION_ERROR: &str = "INGESTION_ERROR";
pub const SOURCE_UNAVAILABLE: &str = "SOURCE_UNAVAILABLE";
pub const ENHANCEMENT_ERROR: &str = "ENHANCEMENT_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const PIPELINE_ERROR: &str = "PIPELINE_ERROR";
