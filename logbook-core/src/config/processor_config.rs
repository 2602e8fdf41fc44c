use serde::{Deserialize, Serialize};

use super::defaults;

/// Model selection passed through to the text-generation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub provider: String,
    pub model_id: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_MODEL_PROVIDER.to_string(),
            model_id: defaults::DEFAULT_MODEL_ID.to_string(),
            temperature: defaults::DEFAULT_TEMPERATURE,
            max_tokens: defaults::DEFAULT_MAX_TOKENS,
        }
    }
}

/// Processor stage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub model: ModelConfig,
    /// Instruction placed ahead of the context. `None` uses the built-in one.
    pub system_prompt: Option<String>,
}
