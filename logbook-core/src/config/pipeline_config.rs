use serde::{Deserialize, Serialize};

use super::{AssemblyConfig, FormatterOptions, ProcessorConfig, RetrievalConfig};

/// Per-request configuration for `Pipeline::execute`, one section per stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub retrieval: RetrievalConfig,
    pub assembly: AssemblyConfig,
    pub processor: ProcessorConfig,
    pub formatter: FormatterOptions,
}
