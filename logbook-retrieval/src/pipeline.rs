//! Pipeline: retrieval -> assembly -> processing -> formatting.

use std::sync::Arc;
use std::time::Instant;

use logbook_core::config::PipelineConfig;
use logbook_core::errors::{LogbookResult, PipelineError, PipelineStage};
use logbook_core::models::{PipelineResult, StageTimings};
use logbook_core::traits::{Assembler, Formatter, Processor, Retriever};
use tracing::{debug, info, info_span};

/// Four stages, strictly linear. Each stage's output is the next stage's
/// only input; any stage failure fails the whole call.
pub struct Pipeline {
    retriever: Arc<dyn Retriever>,
    assembler: Arc<dyn Assembler>,
    processor: Arc<dyn Processor>,
    formatter: Arc<dyn Formatter>,
}

impl Pipeline {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        assembler: Arc<dyn Assembler>,
        processor: Arc<dyn Processor>,
        formatter: Arc<dyn Formatter>,
    ) -> Self {
        Self {
            retriever,
            assembler,
            processor,
            formatter,
        }
    }

    pub fn execute(&self, query: &str, config: &PipelineConfig) -> LogbookResult<PipelineResult> {
        let span = info_span!(
            "pipeline.execute",
            retriever = self.retriever.name(),
            processor = self.processor.processor_type()
        );
        let _guard = span.enter();
        let mut timings = StageTimings::default();

        let started = Instant::now();
        let items = self
            .retriever
            .retrieve(query, &config.retrieval)
            .map_err(|e| PipelineError::stage_failed(PipelineStage::Retrieval, e))?;
        timings.retrieval = started.elapsed();
        let retrieval_count = items.len();
        debug!(retrieval_count, "retrieval stage done");

        let started = Instant::now();
        let context = self
            .assembler
            .assemble(items, &config.assembly)
            .map_err(|e| PipelineError::stage_failed(PipelineStage::Assembly, e))?;
        timings.assembly = started.elapsed();
        let assembly_count = context.items().len();
        let truncated = context.truncated();
        debug!(assembly_count, chars = context.total_chars(), truncated, "assembly stage done");

        let started = Instant::now();
        let processed = self
            .processor
            .process(query, &context, &config.processor)
            .map_err(|e| PipelineError::stage_failed(PipelineStage::Processing, e))?;
        timings.processing = started.elapsed();

        let started = Instant::now();
        let response = self
            .formatter
            .format(&processed, &config.formatter)
            .map_err(|e| PipelineError::stage_failed(PipelineStage::Formatting, e))?;
        timings.formatting = started.elapsed();

        info!(
            retrieval_count,
            assembly_count,
            truncated,
            citations = processed.citations.len(),
            total_ms = timings.total().as_millis() as u64,
            "pipeline executed"
        );

        Ok(PipelineResult {
            response,
            retrieval_count,
            assembly_count,
            processor_type: self.processor.processor_type().to_string(),
            truncated,
            timings,
        })
    }
}
