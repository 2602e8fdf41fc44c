//! SingleLlmProcessor: one text-generation call over the assembled context.

use std::sync::Arc;

use logbook_core::config::ProcessorConfig;
use logbook_core::constants::GENERATION_FAILED_PREFIX;
use logbook_core::errors::{GenerationError, LogbookErrorCode, LogbookResult};
use logbook_core::models::{AssembledContext, CitationSet, ProcessedResult};
use logbook_core::traits::{Processor, TextGenerator};
use tracing::{debug, warn};

use super::{citations, insufficient_information, prompt};

pub const SINGLE_LLM_PROCESSOR: &str = "single_llm";

/// Never fails on generation errors: a broken or empty completion becomes an
/// answer starting with [`GENERATION_FAILED_PREFIX`] with no citations.
pub struct SingleLlmProcessor {
    generator: Arc<dyn TextGenerator>,
}

impl SingleLlmProcessor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    fn generate(&self, prompt: &str, config: &ProcessorConfig) -> LogbookResult<String> {
        let answer = self.generator.complete(prompt, &config.model)?;
        if answer.trim().is_empty() {
            return Err(GenerationError::EmptyCompletion.into());
        }
        Ok(answer)
    }
}

impl Processor for SingleLlmProcessor {
    fn processor_type(&self) -> &str {
        SINGLE_LLM_PROCESSOR
    }

    fn process(
        &self,
        query: &str,
        context: &AssembledContext,
        config: &ProcessorConfig,
    ) -> LogbookResult<ProcessedResult> {
        if context.is_empty() {
            debug!("empty context, skipping text generation");
            return Ok(insufficient_information());
        }

        let prompt = prompt::build_prompt(query, context, config.system_prompt.as_deref());
        match self.generate(&prompt, config) {
            Ok(answer) => {
                let citations = citations::citations_or_context(&answer, context);
                Ok(ProcessedResult {
                    answer,
                    items: context.items().to_vec(),
                    reasoning: None,
                    citations,
                })
            }
            Err(e) => {
                warn!(
                    model = %config.model.model_id,
                    error = %e,
                    code = e.error_code(),
                    "text generation failed, returning degraded answer"
                );
                Ok(ProcessedResult {
                    answer: format!("{GENERATION_FAILED_PREFIX}: {e}"),
                    items: context.items().to_vec(),
                    reasoning: None,
                    citations: CitationSet::new(),
                })
            }
        }
    }
}
