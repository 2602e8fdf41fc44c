//! SqliteRepository: the durable `IngestionRepository`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use logbook_core::errors::LogbookResult;
use logbook_core::models::{
    EnhancementRecord, EnhancementState, IngestionRun, LogEntry, RunCounts, UpsertOutcome,
};
use logbook_core::traits::IngestionRepository;
use tracing::debug;

use crate::connection::writer::with_immediate_transaction;
use crate::connection::DatabaseManager;
use crate::queries::{enhancements, entries, ingestion_runs};

/// Writes go through the serialized writer, reads through the pool.
#[derive(Clone)]
pub struct SqliteRepository {
    db: Arc<DatabaseManager>,
}

impl SqliteRepository {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Arc<DatabaseManager> {
        &self.db
    }

    pub fn get_entry(&self, id: &str) -> LogbookResult<Option<LogEntry>> {
        self.db.with_reader(|conn| entries::get_entry(conn, id))
    }

    pub fn count_entries(&self) -> LogbookResult<usize> {
        self.db.with_reader(entries::count_entries)
    }

    /// Newest runs first, optionally for one source.
    pub fn recent_runs(
        &self,
        source_system: Option<&str>,
        limit: usize,
    ) -> LogbookResult<Vec<IngestionRun>> {
        self.db
            .with_reader(|conn| ingestion_runs::query_recent(conn, source_system, limit))
    }

    pub fn enhancement_status(&self, entry_id: &str) -> LogbookResult<Vec<EnhancementRecord>> {
        self.db
            .with_reader(|conn| enhancements::status_for_entry(conn, entry_id))
    }

    fn mark_enhancement(
        &self,
        entry_id: &str,
        enhancer: &str,
        state: EnhancementState,
        error: Option<&str>,
    ) -> LogbookResult<()> {
        self.db.with_writer(|conn| {
            enhancements::mark(conn, entry_id, enhancer, state, error, &Utc::now())
        })
    }
}

impl IngestionRepository for SqliteRepository {
    fn upsert_entry(&self, entry: &LogEntry) -> LogbookResult<UpsertOutcome> {
        let outcome = self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| entries::upsert_entry(tx, entry))
        })?;
        debug!(entry_id = %entry.id, ?outcome, "upserted entry");
        Ok(outcome)
    }

    fn start_ingestion_run(&self, source_system: &str) -> LogbookResult<String> {
        let id = uuid::Uuid::new_v4().to_string();
        self.db.with_writer(|conn| {
            ingestion_runs::insert_run_start(conn, &id, source_system, &Utc::now())
        })?;
        Ok(id)
    }

    fn complete_ingestion_run(&self, run_id: &str, counts: &RunCounts) -> LogbookResult<()> {
        self.db
            .with_writer(|conn| ingestion_runs::complete_run(conn, run_id, &Utc::now(), counts))
    }

    fn fail_ingestion_run(&self, run_id: &str, error_message: &str) -> LogbookResult<()> {
        self.db.with_writer(|conn| {
            ingestion_runs::fail_run(conn, run_id, &Utc::now(), error_message)
        })
    }

    fn last_successful_run(&self, source_system: &str) -> LogbookResult<Option<DateTime<Utc>>> {
        self.db
            .with_reader(|conn| ingestion_runs::last_successful_run(conn, source_system))
    }

    fn mark_enhancement_complete(&self, entry_id: &str, enhancer: &str) -> LogbookResult<()> {
        self.mark_enhancement(entry_id, enhancer, EnhancementState::Complete, None)
    }

    fn mark_enhancement_failed(
        &self,
        entry_id: &str,
        enhancer: &str,
        error_message: &str,
    ) -> LogbookResult<()> {
        self.mark_enhancement(
            entry_id,
            enhancer,
            EnhancementState::Failed,
            Some(error_message),
        )
    }

    fn failed_enhancements(&self, enhancer: &str, limit: usize) -> LogbookResult<Vec<LogEntry>> {
        self.db
            .with_reader(|conn| enhancements::failed_entries(conn, enhancer, limit))
    }
}
