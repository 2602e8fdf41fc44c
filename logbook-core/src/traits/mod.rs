//! Trait seams between the core and its collaborators.

pub mod adapter;
pub mod assembler;
pub mod enhancer;
pub mod formatter;
pub mod processor;
pub mod repository;
pub mod retriever;
pub mod text_generator;

pub use adapter::{EntryStream, IngestionAdapter};
pub use assembler::Assembler;
pub use enhancer::Enhancer;
pub use formatter::Formatter;
pub use processor::Processor;
pub use repository::IngestionRepository;
pub use retriever::Retriever;
pub use text_generator::TextGenerator;
