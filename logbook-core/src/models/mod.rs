//! Data model shared across the workspace.

pub mod assembled_context;
pub mod entry;
pub mod formatted_response;
pub mod ingestion;
pub mod pipeline_result;
pub mod processed_result;
pub mod retrieved_item;

pub use assembled_context::AssembledContext;
pub use entry::{LogEntry, UpsertOutcome};
pub use formatted_response::FormattedResponse;
pub use ingestion::{
    EnhancementRecord, EnhancementState, IngestionPollResult, IngestionRun, RunCounts, RunStatus,
};
pub use pipeline_result::{PipelineResult, StageTimings};
pub use processed_result::{CitationSet, ProcessedResult};
pub use retrieved_item::{Metadata, RetrievedItem};
