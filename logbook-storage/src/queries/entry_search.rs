//! Full-text search over log_entries_fts.

use chrono::{DateTime, Utc};
use logbook_core::errors::LogbookResult;
use logbook_core::models::LogEntry;
use rusqlite::{params, Connection};

use super::entries::{RawEntry, ENTRY_COLUMNS};
use super::format_ts;
use crate::sqlite_err;

/// Turn free text into an FTS5 expression: every word quoted, joined with OR.
///
/// Quoting keeps FTS5 operators and punctuation in user input from being
/// parsed as query syntax. Returns `None` when nothing searchable remains.
pub fn to_match_expression(query: &str) -> Option<String> {
    let tokens: Vec<String> = query
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(|t| format!("\"{t}\""))
        .collect();
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" OR "))
    }
}

/// Entries matching `query` inside the optional time window, best first.
///
/// The returned score is FTS5's `bm25()`, where lower is better.
pub fn search(
    conn: &Connection,
    query: &str,
    limit: usize,
    start: Option<&DateTime<Utc>>,
    end: Option<&DateTime<Utc>>,
) -> LogbookResult<Vec<(LogEntry, f64)>> {
    let Some(expression) = to_match_expression(query) else {
        return Ok(Vec::new());
    };
    if limit == 0 {
        return Ok(Vec::new());
    }

    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {ENTRY_COLUMNS}, bm25(log_entries_fts) AS rank
             FROM log_entries_fts
             JOIN log_entries e ON e.seq = log_entries_fts.rowid
             WHERE log_entries_fts MATCH ?1
               AND (?2 IS NULL OR e.timestamp >= ?2)
               AND (?3 IS NULL OR e.timestamp <= ?3)
             ORDER BY rank, e.seq
             LIMIT ?4"
        ))
        .map_err(sqlite_err)?;

    let rows = stmt
        .query_map(
            params![
                expression,
                start.map(format_ts),
                end.map(format_ts),
                limit as i64
            ],
            |row| Ok((RawEntry::from_row(row)?, row.get::<_, f64>(8)?)),
        )
        .map_err(sqlite_err)?;

    let mut results = Vec::new();
    for row in rows {
        let (raw, rank) = row.map_err(sqlite_err)?;
        results.push((raw.into_entry()?, rank));
    }
    Ok(results)
}
