//! The persisted `schema_migrations` table.

use chrono::{DateTime, Utc};
use logbook_core::constants::MIGRATIONS_TABLE;
use logbook_core::errors::LogbookResult;
use rusqlite::{params, Connection, OptionalExtension};

use crate::queries::{format_ts, parse_ts};
use crate::sqlite_err;

/// A row of `schema_migrations`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedMigration {
    pub name: String,
    pub applied_at: DateTime<Utc>,
}

/// Create the tracking table if it does not exist yet.
pub fn ensure_table(conn: &Connection) -> LogbookResult<()> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {MIGRATIONS_TABLE} (
            name       TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL
        );"
    ))
    .map_err(sqlite_err)
}

pub fn is_applied(conn: &Connection, name: &str) -> LogbookResult<bool> {
    conn.query_row(
        &format!("SELECT 1 FROM {MIGRATIONS_TABLE} WHERE name = ?1"),
        params![name],
        |_| Ok(()),
    )
    .optional()
    .map(|row| row.is_some())
    .map_err(sqlite_err)
}

pub fn mark_applied(conn: &Connection, name: &str) -> LogbookResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO {MIGRATIONS_TABLE} (name, applied_at) VALUES (?1, ?2)
             ON CONFLICT(name) DO NOTHING"
        ),
        params![name, format_ts(&Utc::now())],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

pub fn mark_unapplied(conn: &Connection, name: &str) -> LogbookResult<()> {
    conn.execute(
        &format!("DELETE FROM {MIGRATIONS_TABLE} WHERE name = ?1"),
        params![name],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

/// Every applied migration, in application order.
pub fn applied(conn: &Connection) -> LogbookResult<Vec<AppliedMigration>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT name, applied_at FROM {MIGRATIONS_TABLE} ORDER BY applied_at, rowid"
        ))
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
        .map_err(sqlite_err)?;

    let mut result = Vec::new();
    for row in rows {
        let (name, applied_at) = row.map_err(sqlite_err)?;
        result.push(AppliedMigration {
            name,
            applied_at: parse_ts(&applied_at)?,
        });
    }
    Ok(result)
}
