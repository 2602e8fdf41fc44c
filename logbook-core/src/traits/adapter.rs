use chrono::{DateTime, Utc};

use crate::errors::LogbookResult;
use crate::models::LogEntry;

/// Lazy, finite stream of entries. An `Err` item is a transport-level
/// failure and ends the poll cycle.
pub type EntryStream<'a> = Box<dyn Iterator<Item = LogbookResult<LogEntry>> + 'a>;

/// Source-system specific producer of raw entries.
pub trait IngestionAdapter: Send + Sync {
    fn source_system(&self) -> &str;

    /// Entries newer than `since` (all entries when `None`), up to `until`.
    /// Each call re-fetches from the source; streams are not restartable.
    fn fetch_entries(
        &self,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> LogbookResult<EntryStream<'_>>;
}
