use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::formatted_response::FormattedResponse;

/// Wall-clock time spent in each pipeline stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimings {
    pub retrieval: Duration,
    pub assembly: Duration,
    pub processing: Duration,
    pub formatting: Duration,
}

impl StageTimings {
    pub fn total(&self) -> Duration {
        self.retrieval + self.assembly + self.processing + self.formatting
    }
}

/// Diagnostic envelope returned by `Pipeline::execute`. Not user-facing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub response: FormattedResponse,
    pub retrieval_count: usize,
    pub assembly_count: usize,
    pub processor_type: String,
    pub truncated: bool,
    pub timings: StageTimings,
}
