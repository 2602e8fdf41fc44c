//! Ingestion run records and poll results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one poll cycle. Never mutated after it is returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestionPollResult {
    pub entries_added: usize,
    pub entries_updated: usize,
    pub entries_unchanged: usize,
    pub entries_failed: usize,
    pub duration_seconds: f64,
    pub since: Option<DateTime<Utc>>,
}

impl IngestionPollResult {
    /// Zero-result for a skipped cycle.
    pub fn skipped(since: Option<DateTime<Utc>>) -> Self {
        Self {
            since,
            ..Self::default()
        }
    }

    pub fn entries_seen(&self) -> usize {
        self.entries_added + self.entries_updated + self.entries_unchanged + self.entries_failed
    }
}

/// Final counts written to a completed run record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounts {
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub enhancements_failed: usize,
}

/// Status of a persisted ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// A row of the ingestion run history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionRun {
    pub id: String,
    pub source_system: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: RunStatus,
    pub counts: RunCounts,
    pub error: Option<String>,
}

/// Whether an enhancer has processed an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnhancementState {
    Complete,
    Failed,
}

impl EnhancementState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "complete" => Some(Self::Complete),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Latest enhancement outcome for one (entry, enhancer) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancementRecord {
    pub entry_id: String,
    pub enhancer: String,
    pub state: EnhancementState,
    pub error: Option<String>,
    pub attempts: u32,
    pub updated_at: DateTime<Utc>,
}
