//! 001: log_entries: the canonical entry store.

use logbook_core::errors::LogbookResult;
use rusqlite::Connection;

use super::Migration;
use crate::sqlite_err;

pub struct LogEntries;

impl Migration for LogEntries {
    fn name(&self) -> &str {
        "001_log_entries"
    }

    fn up(&self, conn: &Connection) -> LogbookResult<()> {
        // `seq` is the integer rowid the FTS index points at; `id` is the
        // entry's external identifier.
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS log_entries (
                seq           INTEGER PRIMARY KEY AUTOINCREMENT,
                id            TEXT NOT NULL UNIQUE,
                source_system TEXT NOT NULL,
                timestamp     TEXT NOT NULL,
                author        TEXT,
                title         TEXT,
                content       TEXT NOT NULL,
                tags          TEXT NOT NULL DEFAULT '[]',
                metadata      TEXT NOT NULL DEFAULT '{}',
                content_hash  TEXT NOT NULL,
                ingested_at   TEXT NOT NULL,
                updated_at    TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_log_entries_timestamp
                ON log_entries(timestamp);
            CREATE INDEX IF NOT EXISTS idx_log_entries_source_time
                ON log_entries(source_system, timestamp);
            ",
        )
        .map_err(sqlite_err)
    }

    fn down(&self, conn: &Connection) -> LogbookResult<()> {
        conn.execute_batch("DROP TABLE IF EXISTS log_entries;")
            .map_err(sqlite_err)
    }
}
