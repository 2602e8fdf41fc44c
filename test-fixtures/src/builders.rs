use chrono::{DateTime, Duration, TimeZone, Utc};
use logbook_core::models::{LogEntry, RetrievedItem};

/// 2024-01-01T00:00:00Z, the fixed origin for fixture timestamps.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Entry from source `"test"` stamped `minutes` after [`base_time`].
pub fn entry_at(id: &str, content: &str, minutes: i64) -> LogEntry {
    LogEntry::new(id, "test", base_time() + Duration::minutes(minutes), content)
}

pub fn entry(id: &str, content: &str) -> LogEntry {
    entry_at(id, content, 0)
}

pub fn item(id: &str, score: f64, source: &str) -> RetrievedItem {
    RetrievedItem::new(entry(id, &format!("content of {id}")), score, source)
}
