//! RetrievedItem: one ranked hit produced by a retriever.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::entry::LogEntry;
use crate::constants::METADATA_SOURCES;

/// Ordered key -> value metadata attached to an item.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// A ranked hit. Every item in one retriever's result list carries that
/// retriever's name as `source`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedItem {
    pub entry: LogEntry,
    pub score: f64,
    pub source: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl RetrievedItem {
    pub fn new(entry: LogEntry, score: f64, source: impl Into<String>) -> Self {
        Self {
            entry,
            score,
            source: source.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn entry_id(&self) -> &str {
        &self.entry.id
    }

    /// Retrievers that contributed to this item. For unfused items this is
    /// just `source`.
    pub fn sources(&self) -> Vec<String> {
        match self.metadata.get(METADATA_SOURCES) {
            Some(serde_json::Value::Array(values)) => values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => vec![self.source.clone()],
        }
    }
}
