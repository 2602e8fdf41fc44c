use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use super::logbook_config::invalid;
use crate::errors::ConfigError;

/// Ingestion scheduler configuration, one per source system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Source system identifier used for run records.
    pub source_system: String,
    /// Sleep between successful polls, in seconds.
    pub base_interval_secs: f64,
    /// Growth factor applied per consecutive failure.
    pub backoff_multiplier: f64,
    /// Ceiling on the sleep interval, in seconds.
    pub max_interval_secs: f64,
    /// Consecutive poll failures that stop the scheduler for good.
    pub max_consecutive_failures: u32,
    /// Skip polling until a full ingest has recorded a successful run.
    pub require_initial_ingest: bool,
    /// Maximum entries requested from the adapter per poll.
    pub fetch_limit: Option<usize>,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            source_system: String::new(),
            base_interval_secs: defaults::DEFAULT_BASE_INTERVAL_SECS,
            backoff_multiplier: defaults::DEFAULT_BACKOFF_MULTIPLIER,
            max_interval_secs: defaults::DEFAULT_MAX_INTERVAL_SECS,
            max_consecutive_failures: defaults::DEFAULT_MAX_CONSECUTIVE_FAILURES,
            require_initial_ingest: defaults::DEFAULT_REQUIRE_INITIAL_INGEST,
            fetch_limit: None,
        }
    }
}

impl IngestionConfig {
    pub fn for_source(source_system: impl Into<String>) -> Self {
        Self {
            source_system: source_system.into(),
            ..Self::default()
        }
    }

    /// Reject intervals and multipliers the backoff schedule cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_interval_secs.is_finite() || self.base_interval_secs <= 0.0 {
            return Err(invalid("ingestion.base_interval_secs", "must be greater than 0"));
        }
        if !self.max_interval_secs.is_finite() || self.max_interval_secs < self.base_interval_secs {
            return Err(invalid(
                "ingestion.max_interval_secs",
                "must be at least base_interval_secs",
            ));
        }
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(invalid("ingestion.backoff_multiplier", "must be at least 1.0"));
        }
        if self.max_consecutive_failures == 0 {
            return Err(invalid(
                "ingestion.max_consecutive_failures",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Zero when the value is negative or not finite; see [`validate`](Self::validate).
    pub fn base_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.base_interval_secs).unwrap_or_default()
    }

    pub fn max_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.max_interval_secs).unwrap_or_default()
    }
}
