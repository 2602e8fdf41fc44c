//! 004: per-entry, per-enhancer outcome tracking.

use logbook_core::errors::LogbookResult;
use rusqlite::Connection;

use super::Migration;
use crate::sqlite_err;

pub struct EnhancementStatus;

impl Migration for EnhancementStatus {
    fn name(&self) -> &str {
        "004_enhancement_status"
    }

    fn depends_on(&self) -> Vec<&str> {
        vec!["001_log_entries"]
    }

    fn up(&self, conn: &Connection) -> LogbookResult<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS enhancement_status (
                entry_id   TEXT NOT NULL REFERENCES log_entries(id) ON DELETE CASCADE,
                enhancer   TEXT NOT NULL,
                state      TEXT NOT NULL CHECK (state IN ('complete', 'failed')),
                error      TEXT,
                attempts   INTEGER NOT NULL DEFAULT 1,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (entry_id, enhancer)
            );

            CREATE INDEX IF NOT EXISTS idx_enhancement_status_state
                ON enhancement_status(enhancer, state);
            ",
        )
        .map_err(sqlite_err)
    }
}
