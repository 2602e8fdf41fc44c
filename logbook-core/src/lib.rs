//! # logbook-core
//!
//! Foundation crate for the logbook search system.
//! Defines the shared types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::{LogbookConfig, PipelineConfig, RetrievalConfig};
pub use errors::{LogbookError, LogbookResult};
pub use models::{AssembledContext, LogEntry, ProcessedResult, RetrievedItem};
