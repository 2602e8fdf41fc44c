//! 003: ingestion_runs: one row per poll, the source of the `since` bound.

use logbook_core::errors::LogbookResult;
use rusqlite::Connection;

use super::Migration;
use crate::sqlite_err;

pub struct IngestionRuns;

impl Migration for IngestionRuns {
    fn name(&self) -> &str {
        "003_ingestion_runs"
    }

    fn depends_on(&self) -> Vec<&str> {
        vec!["001_log_entries"]
    }

    fn up(&self, conn: &Connection) -> LogbookResult<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS ingestion_runs (
                id                  TEXT PRIMARY KEY,
                source_system       TEXT NOT NULL,
                started_at          TEXT NOT NULL,
                completed_at        TEXT,
                status              TEXT NOT NULL DEFAULT 'running'
                    CHECK (status IN ('running', 'completed', 'failed')),
                entries_added       INTEGER NOT NULL DEFAULT 0,
                entries_updated     INTEGER NOT NULL DEFAULT 0,
                entries_unchanged   INTEGER NOT NULL DEFAULT 0,
                entries_failed      INTEGER NOT NULL DEFAULT 0,
                enhancements_failed INTEGER NOT NULL DEFAULT 0,
                error               TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_ingestion_runs_source_status
                ON ingestion_runs(source_system, status, started_at);
            ",
        )
        .map_err(sqlite_err)
    }
}
