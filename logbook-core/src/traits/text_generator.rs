use crate::config::ModelConfig;
use crate::errors::LogbookResult;

/// External text-generation service (LLM completion).
pub trait TextGenerator: Send + Sync {
    fn complete(&self, prompt: &str, model: &ModelConfig) -> LogbookResult<String>;
}
