use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use logbook_core::errors::{IngestionError, LogbookResult};
use logbook_core::models::LogEntry;
use logbook_core::traits::{EntryStream, IngestionAdapter};

/// What one `fetch_entries` call does.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// Stream these entries successfully.
    Entries(Vec<LogEntry>),
    /// Fail before streaming anything.
    Unavailable(String),
    /// Stream these entries, then fail mid-stream.
    BreakAfter(Vec<LogEntry>, String),
}

/// Adapter that replays scripted steps, then `fallback` forever.
pub struct ScriptedAdapter {
    source_system: String,
    steps: Mutex<VecDeque<ScriptStep>>,
    fallback: ScriptStep,
    calls: AtomicUsize,
    windows: Mutex<Vec<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)>>,
}

impl ScriptedAdapter {
    pub fn new(source_system: &str, steps: Vec<ScriptStep>) -> Self {
        Self {
            source_system: source_system.to_string(),
            steps: Mutex::new(steps.into()),
            fallback: ScriptStep::Entries(Vec::new()),
            calls: AtomicUsize::new(0),
            windows: Mutex::new(Vec::new()),
        }
    }

    /// Fails every call with `SourceUnavailable`.
    pub fn always_failing(source_system: &str, reason: &str) -> Self {
        Self {
            fallback: ScriptStep::Unavailable(reason.to_string()),
            ..Self::new(source_system, Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(since, until)` for every call, in order.
    pub fn windows(&self) -> Vec<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
        self.windows.lock().map(|w| w.clone()).unwrap_or_default()
    }

    fn next_step(&self) -> ScriptStep {
        self.steps
            .lock()
            .ok()
            .and_then(|mut steps| steps.pop_front())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl IngestionAdapter for ScriptedAdapter {
    fn source_system(&self) -> &str {
        &self.source_system
    }

    fn fetch_entries(
        &self,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> LogbookResult<EntryStream<'_>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut windows) = self.windows.lock() {
            windows.push((since, until));
        }
        let limit = limit.unwrap_or(usize::MAX);
        let source_system = self.source_system.clone();

        match self.next_step() {
            ScriptStep::Entries(entries) => {
                Ok(Box::new(entries.into_iter().take(limit).map(Ok)))
            }
            ScriptStep::Unavailable(reason) => Err(IngestionError::SourceUnavailable {
                source_system,
                reason,
            }
            .into()),
            ScriptStep::BreakAfter(entries, reason) => {
                let failure = IngestionError::StreamFailed {
                    source_system,
                    reason,
                };
                Ok(Box::new(
                    entries
                        .into_iter()
                        .take(limit)
                        .map(Ok)
                        .chain(std::iter::once(Err(failure.into()))),
                ))
            }
        }
    }
}
