use crate::config::ProcessorConfig;
use crate::errors::LogbookResult;
use crate::models::{AssembledContext, ProcessedResult};

/// Turns (query, context) into an answer with citations.
pub trait Processor: Send + Sync {
    /// Reported as `processor_type` in pipeline diagnostics.
    fn processor_type(&self) -> &str;

    fn process(
        &self,
        query: &str,
        context: &AssembledContext,
        config: &ProcessorConfig,
    ) -> LogbookResult<ProcessedResult>;
}
