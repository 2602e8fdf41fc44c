//! # logbook-retrieval
//!
//! The query side of the logbook: retrievers, rank fusion, the hybrid
//! fan-out retriever, context assembly, processors, formatters, and the
//! four-stage [`Pipeline`] that composes them.

pub mod assembly;
pub mod formatting;
pub mod fusion;
pub mod hybrid;
pub mod pipeline;
pub mod processing;
pub mod retrievers;

pub use assembly::DefaultAssembler;
pub use formatting::{JsonFormatter, MarkdownFormatter};
pub use fusion::{FusionStrategy, ReciprocalRankFusion, WeightedFusion};
pub use hybrid::HybridRetriever;
pub use pipeline::Pipeline;
pub use processing::{ExtractiveProcessor, SingleLlmProcessor};
pub use retrievers::KeywordRetriever;
