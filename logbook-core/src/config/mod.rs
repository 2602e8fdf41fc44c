//! Configuration system for the logbook workspace.
//! TOML-based, layered: env > file > compiled defaults.

pub mod assembly_config;
pub mod defaults;
pub mod formatter_config;
pub mod ingestion_config;
pub mod logbook_config;
pub mod observability_config;
pub mod pipeline_config;
pub mod processor_config;
pub mod retrieval_config;
pub mod storage_config;

pub use assembly_config::AssemblyConfig;
pub use formatter_config::FormatterOptions;
pub use ingestion_config::IngestionConfig;
pub use logbook_config::LogbookConfig;
pub use observability_config::ObservabilityConfig;
pub use pipeline_config::PipelineConfig;
pub use processor_config::{ModelConfig, ProcessorConfig};
pub use retrieval_config::{FusionConfig, FusionKind, RetrievalConfig};
pub use storage_config::StorageConfig;
