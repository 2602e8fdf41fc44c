use std::collections::HashSet;
use std::sync::Mutex;

use logbook_core::errors::EnhancementError;
use logbook_core::models::LogEntry;
use logbook_core::traits::Enhancer;

/// Records every entry it sees; fails for the configured ids until healed.
pub struct RecordingEnhancer {
    name: String,
    failing_ids: Mutex<HashSet<String>>,
    seen: Mutex<Vec<String>>,
}

impl RecordingEnhancer {
    pub fn new(name: &str) -> Self {
        Self::failing_for(name, &[])
    }

    pub fn failing_for(name: &str, ids: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            failing_ids: Mutex::new(ids.iter().map(|id| id.to_string()).collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Stop failing for every id.
    pub fn heal(&self) {
        if let Ok(mut ids) = self.failing_ids.lock() {
            ids.clear();
        }
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Enhancer for RecordingEnhancer {
    fn name(&self) -> &str {
        &self.name
    }

    fn enhance(&self, entry: &LogEntry) -> Result<(), EnhancementError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(entry.id.clone());
        }
        let fails = self
            .failing_ids
            .lock()
            .map(|ids| ids.contains(&entry.id))
            .unwrap_or(false);
        if fails {
            return Err(EnhancementError::new(
                self.name.clone(),
                entry.id.clone(),
                "enhancer rejected entry",
            ));
        }
        Ok(())
    }
}
