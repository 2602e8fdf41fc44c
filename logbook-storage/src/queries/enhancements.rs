//! Queries for the enhancement_status table.

use chrono::{DateTime, Utc};
use logbook_core::errors::{LogbookResult, StorageError};
use logbook_core::models::{EnhancementRecord, EnhancementState, LogEntry};
use rusqlite::{params, Connection};

use super::entries::{RawEntry, ENTRY_COLUMNS};
use super::{format_ts, parse_ts};
use crate::sqlite_err;

/// Record the latest outcome for (entry, enhancer). Every call counts as
/// one attempt.
pub fn mark(
    conn: &Connection,
    entry_id: &str,
    enhancer: &str,
    state: EnhancementState,
    error: Option<&str>,
    at: &DateTime<Utc>,
) -> LogbookResult<()> {
    conn.execute(
        "INSERT INTO enhancement_status (entry_id, enhancer, state, error, attempts, updated_at)
         VALUES (?1, ?2, ?3, ?4, 1, ?5)
         ON CONFLICT(entry_id, enhancer) DO UPDATE SET
            state = excluded.state,
            error = excluded.error,
            attempts = enhancement_status.attempts + 1,
            updated_at = excluded.updated_at",
        params![entry_id, enhancer, state.as_str(), error, format_ts(at)],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

/// Entries whose latest attempt with `enhancer` failed, oldest failure first.
pub fn failed_entries(
    conn: &Connection,
    enhancer: &str,
    limit: usize,
) -> LogbookResult<Vec<LogEntry>> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {ENTRY_COLUMNS}
             FROM enhancement_status s
             JOIN log_entries e ON e.id = s.entry_id
             WHERE s.enhancer = ?1 AND s.state = 'failed'
             ORDER BY s.updated_at, e.seq
             LIMIT ?2"
        ))
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map(params![enhancer, limit as i64], RawEntry::from_row)
        .map_err(sqlite_err)?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(row.map_err(sqlite_err)?.into_entry()?);
    }
    Ok(entries)
}

/// Every enhancer outcome recorded for one entry, by enhancer name.
pub fn status_for_entry(conn: &Connection, entry_id: &str) -> LogbookResult<Vec<EnhancementRecord>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT entry_id, enhancer, state, error, attempts, updated_at
             FROM enhancement_status WHERE entry_id = ?1 ORDER BY enhancer",
        )
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map(params![entry_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, String>(5)?,
            ))
        })
        .map_err(sqlite_err)?;

    let mut records = Vec::new();
    for row in rows {
        let (entry_id, enhancer, state, error, attempts, updated_at) = row.map_err(sqlite_err)?;
        let state = EnhancementState::parse(&state).ok_or_else(|| StorageError::MalformedRow {
            details: format!("enhancement {entry_id}/{enhancer}: unknown state {state:?}"),
        })?;
        records.push(EnhancementRecord {
            entry_id,
            enhancer,
            state,
            error,
            attempts: attempts as u32,
            updated_at: parse_ts(&updated_at)?,
        });
    }
    Ok(records)
}
