use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use logbook_core::errors::{LogbookResult, StorageError};
use logbook_core::models::{
    EnhancementRecord, EnhancementState, IngestionRun, LogEntry, RunCounts, RunStatus,
    UpsertOutcome,
};
use logbook_core::traits::IngestionRepository;

#[derive(Default)]
struct State {
    entries: BTreeMap<String, LogEntry>,
    runs: Vec<IngestionRun>,
    enhancements: BTreeMap<(String, String), EnhancementRecord>,
    rejected_ids: HashSet<String>,
    reject_completions: bool,
    next_run: usize,
}

/// `IngestionRepository` kept in memory, with hooks to make upserts fail.
#[derive(Default)]
pub struct InMemoryRepository {
    state: Mutex<State>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> LogbookResult<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| {
            StorageError::SqliteError {
                message: "in-memory repository poisoned".to_string(),
            }
            .into()
        })
    }

    /// Make every upsert of `entry_id` fail.
    pub fn reject_upserts_of(&self, entry_id: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.rejected_ids.insert(entry_id.to_string());
        }
    }

    /// Make every `complete_ingestion_run` fail.
    pub fn reject_run_completions(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.reject_completions = true;
        }
    }

    /// Record a completed run that started at `started_at`.
    pub fn seed_completed_run(&self, source_system: &str, started_at: DateTime<Utc>) {
        if let Ok(mut state) = self.state.lock() {
            state.next_run += 1;
            let id = format!("seed-{}", state.next_run);
            state.runs.push(IngestionRun {
                id,
                source_system: source_system.to_string(),
                started_at,
                completed_at: Some(started_at),
                status: RunStatus::Completed,
                counts: RunCounts::default(),
                error: None,
            });
        }
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.state
            .lock()
            .map(|s| s.entries.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn runs(&self) -> Vec<IngestionRun> {
        self.state.lock().map(|s| s.runs.clone()).unwrap_or_default()
    }

    pub fn enhancement(&self, entry_id: &str, enhancer: &str) -> Option<EnhancementRecord> {
        self.state.lock().ok().and_then(|s| {
            s.enhancements
                .get(&(entry_id.to_string(), enhancer.to_string()))
                .cloned()
        })
    }

    fn mark(
        &self,
        entry_id: &str,
        enhancer: &str,
        state: EnhancementState,
        error: Option<&str>,
    ) -> LogbookResult<()> {
        let mut guard = self.state()?;
        let key = (entry_id.to_string(), enhancer.to_string());
        let attempts = guard.enhancements.get(&key).map_or(0, |r| r.attempts) + 1;
        guard.enhancements.insert(
            key,
            EnhancementRecord {
                entry_id: entry_id.to_string(),
                enhancer: enhancer.to_string(),
                state,
                error: error.map(str::to_string),
                attempts,
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }

    fn finish_run(
        &self,
        run_id: &str,
        apply: impl FnOnce(&mut IngestionRun),
    ) -> LogbookResult<()> {
        let mut guard = self.state()?;
        let run = guard
            .runs
            .iter_mut()
            .find(|r| r.id == run_id)
            .ok_or_else(|| StorageError::NotFound {
                entity: "ingestion run".to_string(),
                id: run_id.to_string(),
            })?;
        run.completed_at = Some(Utc::now());
        apply(run);
        Ok(())
    }
}

impl IngestionRepository for InMemoryRepository {
    fn upsert_entry(&self, entry: &LogEntry) -> LogbookResult<UpsertOutcome> {
        let mut guard = self.state()?;
        if guard.rejected_ids.contains(&entry.id) {
            return Err(StorageError::SqliteError {
                message: format!("constraint failed for {}", entry.id),
            }
            .into());
        }
        let outcome = match guard.entries.get(&entry.id) {
            Some(stored) if stored.content_hash() == entry.content_hash() => {
                return Ok(UpsertOutcome::Unchanged)
            }
            Some(_) => UpsertOutcome::Updated,
            None => UpsertOutcome::Inserted,
        };
        guard.entries.insert(entry.id.clone(), entry.clone());
        Ok(outcome)
    }

    fn start_ingestion_run(&self, source_system: &str) -> LogbookResult<String> {
        let mut guard = self.state()?;
        guard.next_run += 1;
        let id = format!("run-{}", guard.next_run);
        guard.runs.push(IngestionRun {
            id: id.clone(),
            source_system: source_system.to_string(),
            started_at: Utc::now(),
            completed_at: None,
            status: RunStatus::Running,
            counts: RunCounts::default(),
            error: None,
        });
        Ok(id)
    }

    fn complete_ingestion_run(&self, run_id: &str, counts: &RunCounts) -> LogbookResult<()> {
        if self.state()?.reject_completions {
            return Err(StorageError::SqliteError {
                message: format!("disk I/O error completing {run_id}"),
            }
            .into());
        }
        self.finish_run(run_id, |run| {
            run.status = RunStatus::Completed;
            run.counts = *counts;
        })
    }

    fn fail_ingestion_run(&self, run_id: &str, error_message: &str) -> LogbookResult<()> {
        self.finish_run(run_id, |run| {
            run.status = RunStatus::Failed;
            run.error = Some(error_message.to_string());
        })
    }

    fn last_successful_run(&self, source_system: &str) -> LogbookResult<Option<DateTime<Utc>>> {
        let guard = self.state()?;
        Ok(guard
            .runs
            .iter()
            .rev()
            .find(|r| r.source_system == source_system && r.status == RunStatus::Completed)
            .map(|r| r.started_at))
    }

    fn mark_enhancement_complete(&self, entry_id: &str, enhancer: &str) -> LogbookResult<()> {
        self.mark(entry_id, enhancer, EnhancementState::Complete, None)
    }

    fn mark_enhancement_failed(
        &self,
        entry_id: &str,
        enhancer: &str,
        error_message: &str,
    ) -> LogbookResult<()> {
        self.mark(
            entry_id,
            enhancer,
            EnhancementState::Failed,
            Some(error_message),
        )
    }

    fn failed_enhancements(&self, enhancer: &str, limit: usize) -> LogbookResult<Vec<LogEntry>> {
        let guard = self.state()?;
        let mut failed: Vec<&EnhancementRecord> = guard
            .enhancements
            .values()
            .filter(|r| r.enhancer == enhancer && r.state == EnhancementState::Failed)
            .collect();
        failed.sort_by_key(|r| r.updated_at);
        Ok(failed
            .into_iter()
            .filter_map(|r| guard.entries.get(&r.entry_id).cloned())
            .take(limit)
            .collect())
    }
}
