use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use logbook_core::config::RetrievalConfig;
use logbook_core::errors::{LogbookResult, RetrievalError};
use logbook_core::models::RetrievedItem;
use logbook_core::traits::Retriever;

/// Returns a fixed list and records the configs it was called with.
pub struct StaticRetriever {
    name: String,
    items: Vec<RetrievedItem>,
    calls: AtomicUsize,
    configs: Mutex<Vec<RetrievalConfig>>,
}

impl StaticRetriever {
    pub fn new(name: &str, items: Vec<RetrievedItem>) -> Self {
        Self {
            name: name.to_string(),
            items,
            calls: AtomicUsize::new(0),
            configs: Mutex::new(Vec::new()),
        }
    }

    /// `(id, score)` pairs stamped with this retriever's name.
    pub fn with_scores(name: &str, scored: &[(&str, f64)]) -> Self {
        let items = scored
            .iter()
            .map(|(id, score)| crate::item(id, *score, name))
            .collect();
        Self::new(name, items)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn configs(&self) -> Vec<RetrievalConfig> {
        self.configs.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Retriever for StaticRetriever {
    fn name(&self) -> &str {
        &self.name
    }

    fn retrieve(&self, _query: &str, config: &RetrievalConfig) -> LogbookResult<Vec<RetrievedItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut configs) = self.configs.lock() {
            configs.push(config.clone());
        }
        Ok(self.items.clone())
    }
}

/// Always fails with `SearchFailed`.
pub struct FailingRetriever {
    name: String,
    calls: AtomicUsize,
}

impl FailingRetriever {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Retriever for FailingRetriever {
    fn name(&self) -> &str {
        &self.name
    }

    fn retrieve(&self, _query: &str, _config: &RetrievalConfig) -> LogbookResult<Vec<RetrievedItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RetrievalError::SearchFailed {
            retriever: self.name.clone(),
            reason: "backend unreachable".to_string(),
        }
        .into())
    }
}
