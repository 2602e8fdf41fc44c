//! Top-level configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    AssemblyConfig, FormatterOptions, FusionConfig, IngestionConfig, ObservabilityConfig,
    PipelineConfig, ProcessorConfig, RetrievalConfig, StorageConfig,
};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`LOGBOOK_*`)
/// 2. TOML file passed to [`LogbookConfig::load`]
/// 3. Compiled defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogbookConfig {
    pub storage: StorageConfig,
    pub retrieval: RetrievalConfig,
    pub fusion: FusionConfig,
    pub assembly: AssemblyConfig,
    pub processor: ProcessorConfig,
    pub formatter: FormatterOptions,
    pub ingestion: IngestionConfig,
    pub observability: ObservabilityConfig,
}

impl LogbookConfig {
    /// Load configuration from `path` (skipped when the file does not exist),
    /// apply `LOGBOOK_*` overrides, then validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// The per-request pipeline configuration implied by this config.
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            retrieval: self.retrieval.clone(),
            assembly: self.assembly.clone(),
            processor: self.processor.clone(),
            formatter: self.formatter.clone(),
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retrieval.max_results == 0 {
            return Err(invalid("retrieval.max_results", "must be greater than 0"));
        }
        if let (Some(start), Some(end)) = (self.retrieval.start_time, self.retrieval.end_time) {
            if start > end {
                return Err(invalid("retrieval.start_time", "must not be after end_time"));
            }
        }
        for (source, weight) in &self.fusion.weights {
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(invalid(
                    &format!("fusion.weights.{source}"),
                    "must be a finite number greater than 0",
                ));
            }
        }
        if self.assembly.max_chars_per_item == Some(0) {
            return Err(invalid("assembly.max_chars_per_item", "must be greater than 0"));
        }

        self.ingestion.validate()?;
        Ok(())
    }

    /// Apply environment variable overrides.
    /// Pattern: `LOGBOOK_DB_PATH`, `LOGBOOK_MAX_RESULTS`, etc.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LOGBOOK_DB_PATH") {
            self.storage.db_path = Some(val);
        }
        if let Ok(val) = std::env::var("LOGBOOK_MAX_RESULTS") {
            if let Ok(v) = val.parse::<usize>() {
                self.retrieval.max_results = v;
            }
        }
        if let Ok(val) = std::env::var("LOGBOOK_RRF_K") {
            if let Ok(v) = val.parse::<u32>() {
                self.fusion.rrf_k = v;
            }
        }
        if let Ok(val) = std::env::var("LOGBOOK_MAX_TOTAL_CHARS") {
            if let Ok(v) = val.parse::<usize>() {
                self.assembly.max_total_chars = v;
            }
        }
        if let Ok(val) = std::env::var("LOGBOOK_MODEL_ID") {
            self.processor.model.model_id = val;
        }
        if let Ok(val) = std::env::var("LOGBOOK_POLL_INTERVAL_SECS") {
            if let Ok(v) = val.parse::<f64>() {
                self.ingestion.base_interval_secs = v;
            }
        }
        if let Ok(val) = std::env::var("LOGBOOK_MAX_CONSECUTIVE_FAILURES") {
            if let Ok(v) = val.parse::<u32>() {
                self.ingestion.max_consecutive_failures = v;
            }
        }
        if let Ok(val) = std::env::var("LOGBOOK_JSON_LOGS") {
            if let Ok(v) = val.parse::<bool>() {
                self.observability.json = v;
            }
        }
    }
}

pub(crate) fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
