//! Processors: (query, assembled context) -> answer with citations.

pub mod citations;
pub mod extractive;
pub mod prompt;
pub mod single_llm;

use logbook_core::constants::INSUFFICIENT_INFORMATION_ANSWER;
use logbook_core::models::{CitationSet, ProcessedResult};

pub use extractive::ExtractiveProcessor;
pub use single_llm::SingleLlmProcessor;

/// Canned answer for an empty context. No collaborator is called.
pub fn insufficient_information() -> ProcessedResult {
    ProcessedResult {
        answer: INSUFFICIENT_INFORMATION_ANSWER.to_string(),
        items: Vec::new(),
        reasoning: None,
        citations: CitationSet::new(),
    }
}
