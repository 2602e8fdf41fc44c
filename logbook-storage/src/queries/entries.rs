//! Queries for the log_entries table.

use chrono::Utc;
use logbook_core::errors::{LogbookResult, StorageError};
use logbook_core::models::{LogEntry, UpsertOutcome};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{format_ts, parse_ts};
use crate::sqlite_err;

/// Column list matching [`RawEntry::from_row`], prefixed with `e.`.
pub(crate) const ENTRY_COLUMNS: &str =
    "e.id, e.source_system, e.timestamp, e.author, e.title, e.content, e.tags, e.metadata";

/// Row as stored, before timestamp and JSON decoding.
pub(crate) struct RawEntry {
    id: String,
    source_system: String,
    timestamp: String,
    author: Option<String>,
    title: Option<String>,
    content: String,
    tags: String,
    metadata: String,
}

impl RawEntry {
    /// Read the first eight columns in [`ENTRY_COLUMNS`] order.
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            source_system: row.get(1)?,
            timestamp: row.get(2)?,
            author: row.get(3)?,
            title: row.get(4)?,
            content: row.get(5)?,
            tags: row.get(6)?,
            metadata: row.get(7)?,
        })
    }

    pub(crate) fn into_entry(self) -> LogbookResult<LogEntry> {
        let malformed = |field: &str, e: serde_json::Error| StorageError::MalformedRow {
            details: format!("entry {}: bad {field}: {e}", self.id),
        };
        let tags = serde_json::from_str(&self.tags).map_err(|e| malformed("tags", e))?;
        let metadata =
            serde_json::from_str(&self.metadata).map_err(|e| malformed("metadata", e))?;
        Ok(LogEntry {
            timestamp: parse_ts(&self.timestamp)?,
            id: self.id,
            source_system: self.source_system,
            author: self.author,
            title: self.title,
            content: self.content,
            tags,
            metadata,
        })
    }
}

fn encode_json<T: serde::Serialize>(value: &T, field: &str) -> LogbookResult<String> {
    serde_json::to_string(value).map_err(|e| {
        StorageError::MalformedRow {
            details: format!("cannot encode {field}: {e}"),
        }
        .into()
    })
}

/// Insert or update by id. A re-delivered record with an identical content
/// hash is left untouched and reported as `Unchanged`.
///
/// Run inside a transaction: the hash check and the write must not interleave
/// with another writer.
pub fn upsert_entry(conn: &Connection, entry: &LogEntry) -> LogbookResult<UpsertOutcome> {
    let hash = entry.content_hash();
    let stored_hash: Option<String> = conn
        .query_row(
            "SELECT content_hash FROM log_entries WHERE id = ?1",
            params![entry.id],
            |row| row.get(0),
        )
        .optional()
        .map_err(sqlite_err)?;

    if stored_hash.as_deref() == Some(hash.as_str()) {
        return Ok(UpsertOutcome::Unchanged);
    }

    let tags = encode_json(&entry.tags, "tags")?;
    let metadata = encode_json(&entry.metadata, "metadata")?;
    let now = format_ts(&Utc::now());
    let timestamp = format_ts(&entry.timestamp);

    match stored_hash {
        Some(_) => {
            conn.execute(
                "UPDATE log_entries SET
                    source_system = ?2, timestamp = ?3, author = ?4, title = ?5,
                    content = ?6, tags = ?7, metadata = ?8, content_hash = ?9,
                    updated_at = ?10
                 WHERE id = ?1",
                params![
                    entry.id,
                    entry.source_system,
                    timestamp,
                    entry.author,
                    entry.title,
                    entry.content,
                    tags,
                    metadata,
                    hash,
                    now
                ],
            )
            .map_err(sqlite_err)?;
            Ok(UpsertOutcome::Updated)
        }
        None => {
            conn.execute(
                "INSERT INTO log_entries
                    (id, source_system, timestamp, author, title, content, tags,
                     metadata, content_hash, ingested_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
                params![
                    entry.id,
                    entry.source_system,
                    timestamp,
                    entry.author,
                    entry.title,
                    entry.content,
                    tags,
                    metadata,
                    hash,
                    now
                ],
            )
            .map_err(sqlite_err)?;
            Ok(UpsertOutcome::Inserted)
        }
    }
}

pub fn get_entry(conn: &Connection, id: &str) -> LogbookResult<Option<LogEntry>> {
    let raw = conn
        .query_row(
            &format!("SELECT {ENTRY_COLUMNS} FROM log_entries e WHERE e.id = ?1"),
            params![id],
            RawEntry::from_row,
        )
        .optional()
        .map_err(sqlite_err)?;
    raw.map(RawEntry::into_entry).transpose()
}

pub fn count_entries(conn: &Connection) -> LogbookResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM log_entries", [], |row| row.get(0))
        .map_err(sqlite_err)?;
    Ok(count as usize)
}
