//! Concrete retrievers backed by the logbook store.

pub mod keyword;

pub use keyword::KeywordRetriever;
