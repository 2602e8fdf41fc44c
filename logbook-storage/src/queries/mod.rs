//! Plain query functions over a borrowed `Connection`.
//!
//! Callers decide which connection (writer or pooled reader) and which
//! transaction a query runs in; nothing here locks or begins anything.

pub mod enhancements;
pub mod entries;
pub mod entry_search;
pub mod ingestion_runs;

use chrono::{DateTime, SecondsFormat, Utc};
use logbook_core::errors::{LogbookResult, StorageError};

/// Fixed-width RFC 3339 (microseconds, `Z`), so stored timestamps sort
/// lexicographically in time order.
pub fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_ts(raw: &str) -> LogbookResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            StorageError::MalformedRow {
                details: format!("bad timestamp {raw:?}: {e}"),
            }
            .into()
        })
}

pub(crate) fn parse_ts_opt(raw: Option<String>) -> LogbookResult<Option<DateTime<Utc>>> {
    raw.as_deref().map(parse_ts).transpose()
}
