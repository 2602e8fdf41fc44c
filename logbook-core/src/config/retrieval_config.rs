use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::defaults;

/// Per-request retrieval settings, handed read-only to every retriever.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Maximum number of items returned after fusion.
    pub max_results: usize,
    /// Only entries at or after this instant.
    pub start_time: Option<DateTime<Utc>>,
    /// Only entries at or before this instant.
    pub end_time: Option<DateTime<Utc>>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_results: defaults::DEFAULT_MAX_RESULTS,
            start_time: None,
            end_time: None,
        }
    }
}

impl RetrievalConfig {
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// True when `timestamp` falls inside the configured window.
    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        self.start_time.map_or(true, |start| *timestamp >= start)
            && self.end_time.map_or(true, |end| *timestamp <= end)
    }
}

/// Which fusion algorithm the hybrid retriever uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionKind {
    Rrf,
    Weighted,
}

/// Fusion strategy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub strategy: FusionKind,
    /// RRF k-value.
    pub rrf_k: u32,
    /// Weighted fusion: retriever name -> weight. Unlisted sources weigh 1.0.
    pub weights: BTreeMap<String, f64>,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            strategy: FusionKind::Rrf,
            rrf_k: defaults::DEFAULT_RRF_K,
            weights: BTreeMap::new(),
        }
    }
}
