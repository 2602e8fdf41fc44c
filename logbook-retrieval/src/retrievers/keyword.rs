//! Keyword retrieval over the FTS5 index.

use std::sync::Arc;

use logbook_core::config::RetrievalConfig;
use logbook_core::errors::{LogbookResult, RetrievalError};
use logbook_core::models::RetrievedItem;
use logbook_core::traits::Retriever;
use logbook_storage::queries::entry_search;
use logbook_storage::DatabaseManager;

pub const KEYWORD_RETRIEVER: &str = "keyword";

/// BM25-ranked full-text search. Scores are `-bm25`, so higher is better.
pub struct KeywordRetriever {
    db: Arc<DatabaseManager>,
}

impl KeywordRetriever {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

impl Retriever for KeywordRetriever {
    fn name(&self) -> &str {
        KEYWORD_RETRIEVER
    }

    fn retrieve(&self, query: &str, config: &RetrievalConfig) -> LogbookResult<Vec<RetrievedItem>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let hits = self
            .db
            .with_reader(|conn| {
                entry_search::search(
                    conn,
                    query,
                    config.max_results,
                    config.start_time.as_ref(),
                    config.end_time.as_ref(),
                )
            })
            .map_err(|e| RetrievalError::SearchFailed {
                retriever: KEYWORD_RETRIEVER.to_string(),
                reason: e.to_string(),
            })?;

        Ok(hits
            .into_iter()
            .map(|(entry, bm25)| {
                RetrievedItem::new(entry, -bm25, KEYWORD_RETRIEVER)
                    .with_metadata("bm25", serde_json::json!(bm25))
            })
            .collect())
    }
}
