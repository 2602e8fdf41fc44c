use crate::config::RetrievalConfig;
use crate::errors::LogbookResult;
use crate::models::RetrievedItem;

/// One retrieval strategy (keyword, semantic, hybrid, ...).
pub trait Retriever: Send + Sync {
    /// Name stamped as `source` on every item this retriever returns.
    fn name(&self) -> &str;

    /// Ranked items for `query`, best first.
    fn retrieve(&self, query: &str, config: &RetrievalConfig) -> LogbookResult<Vec<RetrievedItem>>;
}
