use chrono::{DateTime, Utc};

use crate::errors::LogbookResult;
use crate::models::{LogEntry, RunCounts, UpsertOutcome};

/// Durable store used by the ingestion scheduler.
pub trait IngestionRepository: Send + Sync {
    fn upsert_entry(&self, entry: &LogEntry) -> LogbookResult<UpsertOutcome>;

    /// Open a run record with status `running`. Returns the run id.
    fn start_ingestion_run(&self, source_system: &str) -> LogbookResult<String>;

    fn complete_ingestion_run(&self, run_id: &str, counts: &RunCounts) -> LogbookResult<()>;

    fn fail_ingestion_run(&self, run_id: &str, error_message: &str) -> LogbookResult<()>;

    /// Start time of the most recent completed run for `source_system`.
    fn last_successful_run(&self, source_system: &str) -> LogbookResult<Option<DateTime<Utc>>>;

    fn mark_enhancement_complete(&self, entry_id: &str, enhancer: &str) -> LogbookResult<()>;

    fn mark_enhancement_failed(
        &self,
        entry_id: &str,
        enhancer: &str,
        error_message: &str,
    ) -> LogbookResult<()>;

    /// Entries whose latest attempt with `enhancer` failed, oldest first.
    fn failed_enhancements(&self, enhancer: &str, limit: usize) -> LogbookResult<Vec<LogEntry>>;
}
