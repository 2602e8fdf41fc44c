//! 002: external-content FTS5 index over log_entries, kept in sync by triggers.

use logbook_core::errors::LogbookResult;
use rusqlite::Connection;

use super::Migration;
use crate::sqlite_err;

pub struct LogEntriesFts;

impl Migration for LogEntriesFts {
    fn name(&self) -> &str {
        "002_log_entries_fts"
    }

    fn depends_on(&self) -> Vec<&str> {
        vec!["001_log_entries"]
    }

    fn up(&self, conn: &Connection) -> LogbookResult<()> {
        conn.execute_batch(
            "
            CREATE VIRTUAL TABLE IF NOT EXISTS log_entries_fts USING fts5(
                title,
                content,
                author,
                content='log_entries',
                content_rowid='seq'
            );

            CREATE TRIGGER IF NOT EXISTS log_entries_fts_ai AFTER INSERT ON log_entries BEGIN
                INSERT INTO log_entries_fts(rowid, title, content, author)
                VALUES (new.seq, new.title, new.content, new.author);
            END;

            CREATE TRIGGER IF NOT EXISTS log_entries_fts_ad AFTER DELETE ON log_entries BEGIN
                INSERT INTO log_entries_fts(log_entries_fts, rowid, title, content, author)
                VALUES ('delete', old.seq, old.title, old.content, old.author);
            END;

            CREATE TRIGGER IF NOT EXISTS log_entries_fts_au AFTER UPDATE ON log_entries BEGIN
                INSERT INTO log_entries_fts(log_entries_fts, rowid, title, content, author)
                VALUES ('delete', old.seq, old.title, old.content, old.author);
                INSERT INTO log_entries_fts(rowid, title, content, author)
                VALUES (new.seq, new.title, new.content, new.author);
            END;

            INSERT INTO log_entries_fts(log_entries_fts) VALUES ('rebuild');
            ",
        )
        .map_err(sqlite_err)
    }

    fn down(&self, conn: &Connection) -> LogbookResult<()> {
        conn.execute_batch(
            "
            DROP TRIGGER IF EXISTS log_entries_fts_ai;
            DROP TRIGGER IF EXISTS log_entries_fts_ad;
            DROP TRIGGER IF EXISTS log_entries_fts_au;
            DROP TABLE IF EXISTS log_entries_fts;
            ",
        )
        .map_err(sqlite_err)
    }
}
