//! IngestionScheduler: the per-source polling loop.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use chrono::{DateTime, Utc};
use logbook_core::config::IngestionConfig;
use logbook_core::errors::{LogbookError, LogbookErrorCode, LogbookResult};
use logbook_core::models::{IngestionPollResult, LogEntry, RunCounts, UpsertOutcome};
use logbook_core::traits::{Enhancer, IngestionAdapter, IngestionRepository};
use serde::Serialize;
use tracing::{debug, error, info, info_span, warn};

use crate::backoff::BackoffPolicy;
use crate::stop::StopSignal;

/// Where the loop is right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    Idle,
    Polling,
    Sleeping,
    Stopped,
    /// Terminal: too many consecutive failures.
    CircuitOpen,
}

/// Why `start()` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SchedulerExit {
    Stopped,
    CircuitOpen { consecutive_failures: u32 },
}

/// Snapshot returned by [`IngestionScheduler::status`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerStatus {
    pub state: SchedulerState,
    pub consecutive_failures: u32,
    pub last_result: Option<IngestionPollResult>,
    pub last_error: Option<String>,
}

impl Default for SchedulerStatus {
    fn default() -> Self {
        Self {
            state: SchedulerState::Idle,
            consecutive_failures: 0,
            last_result: None,
            last_error: None,
        }
    }
}

/// Outcome of [`IngestionScheduler::retry_failed_enhancements`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnhancementRetryReport {
    pub attempted: usize,
    pub recovered: usize,
    pub still_failing: usize,
}

/// One scheduler per source system. Owns its stop signal; nothing is
/// shared between instances except the repository they write to.
pub struct IngestionScheduler {
    config: IngestionConfig,
    adapter: Arc<dyn IngestionAdapter>,
    repository: Arc<dyn IngestionRepository>,
    enhancers: Vec<Arc<dyn Enhancer>>,
    backoff: BackoffPolicy,
    stop: StopSignal,
    status: Mutex<SchedulerStatus>,
}

impl IngestionScheduler {
    /// Fails with a `ConfigError` when `config` does not validate.
    pub fn new(
        config: IngestionConfig,
        adapter: Arc<dyn IngestionAdapter>,
        repository: Arc<dyn IngestionRepository>,
    ) -> LogbookResult<Self> {
        Ok(Self {
            backoff: BackoffPolicy::from_config(&config)?,
            config,
            adapter,
            repository,
            enhancers: Vec::new(),
            stop: StopSignal::new(),
            status: Mutex::new(SchedulerStatus::default()),
        })
    }

    pub fn with_enhancer(mut self, enhancer: Arc<dyn Enhancer>) -> Self {
        self.enhancers.push(enhancer);
        self
    }

    /// Run records are keyed by this name. Falls back to the adapter's own
    /// name when the config leaves it empty.
    pub fn source_system(&self) -> &str {
        if self.config.source_system.is_empty() {
            self.adapter.source_system()
        } else {
            &self.config.source_system
        }
    }

    pub fn backoff(&self) -> &BackoffPolicy {
        &self.backoff
    }

    /// Ask the loop to stop. An in-flight poll finishes first; a sleeping
    /// loop wakes at once.
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn status(&self) -> SchedulerStatus {
        match self.status.lock() {
            Ok(status) => status.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update_status(&self, f: impl FnOnce(&mut SchedulerStatus)) {
        match self.status.lock() {
            Ok(mut status) => f(&mut status),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }

    fn set_state(&self, state: SchedulerState) {
        self.update_status(|s| s.state = state);
    }

    /// Run the loop on the calling thread until stopped or the circuit opens.
    pub fn start(&self) -> SchedulerExit {
        info!(
            source = self.source_system(),
            max_consecutive_failures = self.config.max_consecutive_failures,
            "ingestion scheduler started"
        );
        let mut failures: u32 = 0;

        while !self.stop.is_stopped() {
            self.set_state(SchedulerState::Polling);
            match self.poll_once() {
                Ok(result) => {
                    failures = 0;
                    info!(
                        source = self.source_system(),
                        added = result.entries_added,
                        updated = result.entries_updated,
                        unchanged = result.entries_unchanged,
                        failed = result.entries_failed,
                        duration_seconds = result.duration_seconds,
                        "poll cycle completed"
                    );
                    self.update_status(|s| {
                        s.consecutive_failures = 0;
                        s.last_result = Some(result);
                        s.last_error = None;
                    });
                }
                Err(e) => {
                    failures = failures.saturating_add(1);
                    warn!(
                        source = self.source_system(),
                        consecutive_failures = failures,
                        error = %e,
                        code = e.error_code(),
                        "poll cycle failed"
                    );
                    let message = e.to_string();
                    self.update_status(|s| {
                        s.consecutive_failures = failures;
                        s.last_error = Some(message);
                    });
                    if failures >= self.config.max_consecutive_failures {
                        error!(
                            source = self.source_system(),
                            consecutive_failures = failures,
                            "circuit breaker open, scheduler stopped until restarted"
                        );
                        self.set_state(SchedulerState::CircuitOpen);
                        return SchedulerExit::CircuitOpen {
                            consecutive_failures: failures,
                        };
                    }
                }
            }

            let interval = self.backoff.interval(failures);
            debug!(
                source = self.source_system(),
                sleep_ms = interval.as_millis() as u64,
                "sleeping"
            );
            self.set_state(SchedulerState::Sleeping);
            if self.stop.sleep(interval) {
                break;
            }
        }

        self.set_state(SchedulerState::Stopped);
        info!(source = self.source_system(), "ingestion scheduler stopped");
        SchedulerExit::Stopped
    }

    /// Run [`start`](Self::start) on a dedicated named thread.
    pub fn spawn(self: Arc<Self>) -> std::io::Result<SchedulerHandle> {
        let stop = self.stop_signal();
        let thread = thread::Builder::new()
            .name(format!("ingest-{}", self.source_system()))
            .spawn(move || self.start())?;
        Ok(SchedulerHandle { stop, thread })
    }

    /// One incremental cycle from the last successful run.
    ///
    /// Skipped (zero result, not an error) when nothing has ever completed
    /// and an initial full ingest is required first.
    pub fn poll_once(&self) -> LogbookResult<IngestionPollResult> {
        let span = info_span!("ingest.poll", source = self.source_system());
        let _guard = span.enter();

        let since = self.repository.last_successful_run(self.source_system())?;
        if since.is_none() && self.config.require_initial_ingest {
            warn!("no successful run recorded, skipping poll until a full ingest completes");
            return Ok(IngestionPollResult::skipped(None));
        }
        self.run_cycle(since, None)
    }

    /// One cycle from the beginning of the source, up to `until`. This is
    /// the initial ingest `poll_once` waits for.
    pub fn full_ingest(&self, until: Option<DateTime<Utc>>) -> LogbookResult<IngestionPollResult> {
        let span = info_span!("ingest.full", source = self.source_system());
        let _guard = span.enter();
        self.run_cycle(None, until)
    }

    fn run_cycle(
        &self,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> LogbookResult<IngestionPollResult> {
        let started = Instant::now();
        let run_id = self.repository.start_ingestion_run(self.source_system())?;
        debug!(run_id = %run_id, ?since, ?until, "ingestion run started");

        let stream = match self.adapter.fetch_entries(since, until, self.config.fetch_limit) {
            Ok(stream) => stream,
            Err(e) => return Err(self.fail_run(&run_id, e)),
        };

        let mut counts = RunCounts::default();
        for next in stream {
            let entry = match next {
                Ok(entry) => entry,
                Err(e) => return Err(self.fail_run(&run_id, e)),
            };

            match self.repository.upsert_entry(&entry) {
                Ok(UpsertOutcome::Inserted) => counts.added += 1,
                Ok(UpsertOutcome::Updated) => counts.updated += 1,
                Ok(UpsertOutcome::Unchanged) => counts.unchanged += 1,
                Err(e) => {
                    counts.failed += 1;
                    warn!(entry_id = %entry.id, error = %e, "upsert failed, entry skipped");
                    continue;
                }
            }
            counts.enhancements_failed += self.enhance(&entry);
        }

        if let Err(e) = self.repository.complete_ingestion_run(&run_id, &counts) {
            return Err(self.fail_run(&run_id, e));
        }
        Ok(IngestionPollResult {
            entries_added: counts.added,
            entries_updated: counts.updated,
            entries_unchanged: counts.unchanged,
            entries_failed: counts.failed,
            duration_seconds: started.elapsed().as_secs_f64(),
            since,
        })
    }

    /// Record `cause` on the run, then hand it back for propagation.
    fn fail_run(&self, run_id: &str, cause: LogbookError) -> LogbookError {
        if let Err(e) = self.repository.fail_ingestion_run(run_id, &cause.to_string()) {
            error!(run_id, error = %e, "could not mark ingestion run failed");
        }
        cause
    }

    /// Run every enhancer on `entry`. Returns how many failed.
    fn enhance(&self, entry: &LogEntry) -> usize {
        let mut failed = 0;
        for enhancer in &self.enhancers {
            let recorded = match enhancer.enhance(entry) {
                Ok(()) => self
                    .repository
                    .mark_enhancement_complete(&entry.id, enhancer.name()),
                Err(e) => {
                    failed += 1;
                    warn!(
                        entry_id = %entry.id,
                        enhancer = enhancer.name(),
                        error = %e,
                        "enhancement failed"
                    );
                    self.repository
                        .mark_enhancement_failed(&entry.id, enhancer.name(), &e.reason)
                }
            };
            if let Err(e) = recorded {
                warn!(
                    entry_id = %entry.id,
                    enhancer = enhancer.name(),
                    error = %e,
                    "could not record enhancement outcome"
                );
            }
        }
        failed
    }

    /// Re-run each enhancer over up to `limit` of the entries whose latest
    /// attempt with it failed.
    pub fn retry_failed_enhancements(&self, limit: usize) -> LogbookResult<EnhancementRetryReport> {
        let mut report = EnhancementRetryReport::default();
        for enhancer in &self.enhancers {
            for entry in self.repository.failed_enhancements(enhancer.name(), limit)? {
                report.attempted += 1;
                match enhancer.enhance(&entry) {
                    Ok(()) => {
                        self.repository
                            .mark_enhancement_complete(&entry.id, enhancer.name())?;
                        report.recovered += 1;
                    }
                    Err(e) => {
                        self.repository
                            .mark_enhancement_failed(&entry.id, enhancer.name(), &e.reason)?;
                        report.still_failing += 1;
                    }
                }
            }
        }
        info!(
            source = self.source_system(),
            attempted = report.attempted,
            recovered = report.recovered,
            still_failing = report.still_failing,
            "enhancement retry finished"
        );
        Ok(report)
    }
}

/// Handle to a scheduler running on its own thread.
pub struct SchedulerHandle {
    stop: StopSignal,
    thread: JoinHandle<SchedulerExit>,
}

impl SchedulerHandle {
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the loop to exit.
    pub fn join(self) -> thread::Result<SchedulerExit> {
        self.thread.join()
    }
}
