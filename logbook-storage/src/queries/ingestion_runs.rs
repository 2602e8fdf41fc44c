//! Queries for the ingestion_runs table.

use chrono::{DateTime, Utc};
use logbook_core::errors::{LogbookResult, StorageError};
use logbook_core::models::{IngestionRun, RunCounts, RunStatus};
use rusqlite::{params, Connection, OptionalExtension};

use super::{format_ts, parse_ts, parse_ts_opt};
use crate::sqlite_err;

/// Insert a run record with status `running`.
pub fn insert_run_start(
    conn: &Connection,
    id: &str,
    source_system: &str,
    started_at: &DateTime<Utc>,
) -> LogbookResult<()> {
    conn.execute(
        "INSERT INTO ingestion_runs (id, source_system, started_at, status)
         VALUES (?1, ?2, ?3, 'running')",
        params![id, source_system, format_ts(started_at)],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

fn ensure_updated(changed: usize, id: &str) -> LogbookResult<()> {
    if changed == 0 {
        return Err(StorageError::NotFound {
            entity: "ingestion run".to_string(),
            id: id.to_string(),
        }
        .into());
    }
    Ok(())
}

pub fn complete_run(
    conn: &Connection,
    id: &str,
    completed_at: &DateTime<Utc>,
    counts: &RunCounts,
) -> LogbookResult<()> {
    let changed = conn
        .execute(
            "UPDATE ingestion_runs SET
                completed_at = ?2, status = 'completed',
                entries_added = ?3, entries_updated = ?4, entries_unchanged = ?5,
                entries_failed = ?6, enhancements_failed = ?7
             WHERE id = ?1",
            params![
                id,
                format_ts(completed_at),
                counts.added as i64,
                counts.updated as i64,
                counts.unchanged as i64,
                counts.failed as i64,
                counts.enhancements_failed as i64
            ],
        )
        .map_err(sqlite_err)?;
    ensure_updated(changed, id)
}

pub fn fail_run(
    conn: &Connection,
    id: &str,
    completed_at: &DateTime<Utc>,
    error: &str,
) -> LogbookResult<()> {
    let changed = conn
        .execute(
            "UPDATE ingestion_runs SET completed_at = ?2, status = 'failed', error = ?3
             WHERE id = ?1",
            params![id, format_ts(completed_at), error],
        )
        .map_err(sqlite_err)?;
    ensure_updated(changed, id)
}

/// `started_at` of the newest completed run for a source.
pub fn last_successful_run(
    conn: &Connection,
    source_system: &str,
) -> LogbookResult<Option<DateTime<Utc>>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT started_at FROM ingestion_runs
             WHERE source_system = ?1 AND status = 'completed'
             ORDER BY started_at DESC, rowid DESC
             LIMIT 1",
            params![source_system],
            |row| row.get(0),
        )
        .optional()
        .map_err(sqlite_err)?;
    parse_ts_opt(raw)
}

/// Newest runs first, optionally for one source.
pub fn query_recent(
    conn: &Connection,
    source_system: Option<&str>,
    limit: usize,
) -> LogbookResult<Vec<IngestionRun>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, source_system, started_at, completed_at, status,
                    entries_added, entries_updated, entries_unchanged, entries_failed,
                    enhancements_failed, error
             FROM ingestion_runs
             WHERE ?1 IS NULL OR source_system = ?1
             ORDER BY started_at DESC, rowid DESC
             LIMIT ?2",
        )
        .map_err(sqlite_err)?;

    let rows = stmt
        .query_map(params![source_system, limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
                RunCounts {
                    added: row.get::<_, i64>(5)? as usize,
                    updated: row.get::<_, i64>(6)? as usize,
                    unchanged: row.get::<_, i64>(7)? as usize,
                    failed: row.get::<_, i64>(8)? as usize,
                    enhancements_failed: row.get::<_, i64>(9)? as usize,
                },
                row.get::<_, Option<String>>(10)?,
            ))
        })
        .map_err(sqlite_err)?;

    let mut runs = Vec::new();
    for row in rows {
        let (id, source_system, started_at, completed_at, status, counts, error) =
            row.map_err(sqlite_err)?;
        let status = RunStatus::parse(&status).ok_or_else(|| StorageError::MalformedRow {
            details: format!("run {id}: unknown status {status:?}"),
        })?;
        runs.push(IngestionRun {
            started_at: parse_ts(&started_at)?,
            completed_at: parse_ts_opt(completed_at)?,
            id,
            source_system,
            status,
            counts,
            error,
        });
    }
    Ok(runs)
}
