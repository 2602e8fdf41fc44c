//! Pipeline stage errors.

use std::fmt;

use super::error_code::{self, LogbookErrorCode};
use super::LogbookError;

/// The four pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Retrieval,
    Assembly,
    Processing,
    Formatting,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retrieval => "retrieval",
            Self::Assembly => "assembly",
            Self::Processing => "processing",
            Self::Formatting => "formatting",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stage failure that aborted `Pipeline::execute`.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("pipeline stage {stage} failed: {source}")]
    StageFailed {
        stage: PipelineStage,
        #[source]
        source: Box<LogbookError>,
    },
}

impl PipelineError {
    pub fn stage_failed(stage: PipelineStage, source: LogbookError) -> Self {
        Self::StageFailed {
            stage,
            source: Box::new(source),
        }
    }

    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::StageFailed { stage, .. } => *stage,
        }
    }
}

impl LogbookErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        error_code::PIPELINE_ERROR
    }
}
