//! ExtractiveProcessor: answers by listing the best entries, no model call.

use logbook_core::config::ProcessorConfig;
use logbook_core::errors::LogbookResult;
use logbook_core::models::{AssembledContext, ProcessedResult};
use logbook_core::traits::Processor;

use super::insufficient_information;

pub const EXTRACTIVE_PROCESSOR: &str = "extractive";

const DEFAULT_MAX_LINES: usize = 5;

pub struct ExtractiveProcessor {
    max_lines: usize,
}

impl ExtractiveProcessor {
    pub fn new(max_lines: usize) -> Self {
        Self { max_lines }
    }
}

impl Default for ExtractiveProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

impl Processor for ExtractiveProcessor {
    fn processor_type(&self) -> &str {
        EXTRACTIVE_PROCESSOR
    }

    fn process(
        &self,
        query: &str,
        context: &AssembledContext,
        _config: &ProcessorConfig,
    ) -> LogbookResult<ProcessedResult> {
        if context.is_empty() {
            return Ok(insufficient_information());
        }

        let mut answer = format!("Logbook entries matching \"{}\":", query.trim());
        for item in context.items().iter().take(self.max_lines) {
            let entry = &item.entry;
            let headline = entry
                .title
                .as_deref()
                .or_else(|| entry.content.lines().find(|l| !l.trim().is_empty()))
                .unwrap_or("")
                .trim();
            answer.push_str(&format!(
                "\n- [#{}] {} {}",
                entry.id,
                entry.timestamp.format("%Y-%m-%d %H:%M"),
                headline
            ));
        }

        Ok(ProcessedResult {
            answer,
            items: context.items().to_vec(),
            reasoning: None,
            citations: context.entry_ids().into_iter().collect(),
        })
    }
}
