//! HybridRetriever: concurrent fan-out over sub-retrievers, then fusion.

use std::sync::Arc;

use logbook_core::config::{FusionConfig, RetrievalConfig};
use logbook_core::constants::HYBRID_SOURCE;
use logbook_core::errors::{LogbookErrorCode, LogbookResult, RetrievalError};
use logbook_core::models::RetrievedItem;
use logbook_core::traits::Retriever;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::fusion::{self, FusionStrategy, ReciprocalRankFusion};

/// Runs every sub-retriever on the rayon pool and fuses whatever succeeded.
///
/// A failing sub-retriever is logged and left out of fusion. When all of
/// them fail the result is empty, not an error.
///
/// A sub-retriever that panics is a bug, not a failure: rayon resumes the
/// panic on the calling thread, so the whole hybrid call unwinds (or, with
/// the release profile's `panic = "abort"`, the process exits). Retrievers
/// must report every expected failure as an `Err`.
pub struct HybridRetriever {
    retrievers: Vec<Arc<dyn Retriever>>,
    fusion: Box<dyn FusionStrategy>,
}

impl HybridRetriever {
    pub fn new(retrievers: Vec<Arc<dyn Retriever>>, fusion: Box<dyn FusionStrategy>) -> Self {
        Self { retrievers, fusion }
    }

    /// Hybrid retriever with RRF at the default `k`.
    pub fn with_rrf(retrievers: Vec<Arc<dyn Retriever>>) -> Self {
        Self::new(retrievers, Box::new(ReciprocalRankFusion::default()))
    }

    pub fn from_config(retrievers: Vec<Arc<dyn Retriever>>, config: &FusionConfig) -> Self {
        Self::new(retrievers, fusion::from_config(config))
    }

    pub fn retrievers(&self) -> &[Arc<dyn Retriever>] {
        &self.retrievers
    }

    pub fn fusion(&self) -> &dyn FusionStrategy {
        self.fusion.as_ref()
    }
}

/// Every item in one retriever's list must carry that retriever's name.
/// Weighted fusion keys the whole list's weight off its first item.
fn check_single_source(
    retriever: &str,
    items: Vec<RetrievedItem>,
) -> LogbookResult<Vec<RetrievedItem>> {
    if let Some(stray) = items.iter().find(|item| item.source != retriever) {
        return Err(RetrievalError::InconsistentSource {
            retriever: retriever.to_string(),
            found: stray.source.clone(),
        }
        .into());
    }
    Ok(items)
}

impl Retriever for HybridRetriever {
    fn name(&self) -> &str {
        HYBRID_SOURCE
    }

    fn retrieve(&self, query: &str, config: &RetrievalConfig) -> LogbookResult<Vec<RetrievedItem>> {
        if query.trim().is_empty() || self.retrievers.is_empty() {
            return Ok(Vec::new());
        }

        // Indexed collect keeps retriever order regardless of finish order.
        let outcomes: Vec<LogbookResult<Vec<RetrievedItem>>> = self
            .retrievers
            .par_iter()
            .map(|retriever| {
                retriever
                    .retrieve(query, config)
                    .and_then(|items| check_single_source(retriever.name(), items))
            })
            .collect();

        let mut lists = Vec::with_capacity(outcomes.len());
        let mut failed = 0usize;
        for (retriever, outcome) in self.retrievers.iter().zip(outcomes) {
            match outcome {
                Ok(items) => {
                    debug!(
                        retriever = retriever.name(),
                        count = items.len(),
                        "sub-retriever returned"
                    );
                    lists.push(items);
                }
                Err(e) => {
                    failed += 1;
                    warn!(
                        retriever = retriever.name(),
                        error = %e,
                        code = e.error_code(),
                        "sub-retriever failed, excluded from fusion"
                    );
                }
            }
        }

        if lists.is_empty() {
            warn!(failed, "every sub-retriever failed");
            return Ok(Vec::new());
        }

        let mut fused = self.fusion.fuse(&lists);
        fused.truncate(config.max_results);
        debug!(
            strategy = self.fusion.name(),
            lists = lists.len(),
            failed,
            returned = fused.len(),
            "fused hybrid results"
        );
        Ok(fused)
    }
}
