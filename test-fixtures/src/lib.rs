//! Test doubles shared by the logbook crates' integration tests.

pub mod adapters;
pub mod builders;
pub mod enhancers;
pub mod generators;
pub mod repository;
pub mod retrievers;

pub use adapters::{ScriptStep, ScriptedAdapter};
pub use builders::{base_time, entry, entry_at, item};
pub use enhancers::RecordingEnhancer;
pub use generators::CountingGenerator;
pub use repository::InMemoryRepository;
pub use retrievers::{FailingRetriever, StaticRetriever};
