use crate::errors::EnhancementError;
use crate::models::LogEntry;

/// Post-ingestion step that augments a stored entry (indexing,
/// summarization, ...). Best-effort: failures are recorded, not raised.
pub trait Enhancer: Send + Sync {
    fn name(&self) -> &str;

    fn enhance(&self, entry: &LogEntry) -> Result<(), EnhancementError>;
}
