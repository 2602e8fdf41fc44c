//! Reciprocal Rank Fusion: score = Σ 1/(k + rank + 1), rank 0-based.

use logbook_core::config::defaults::DEFAULT_RRF_K;
use logbook_core::models::RetrievedItem;

use super::{Accumulator, FusionStrategy};

/// RRF ignores raw scores, so retrievers with incomparable scales fuse
/// without normalization.
#[derive(Debug, Clone, Copy)]
pub struct ReciprocalRankFusion {
    k: u32,
}

impl ReciprocalRankFusion {
    pub fn new(k: u32) -> Self {
        Self { k }
    }

    pub fn k(&self) -> u32 {
        self.k
    }
}

impl Default for ReciprocalRankFusion {
    fn default() -> Self {
        Self::new(DEFAULT_RRF_K)
    }
}

impl FusionStrategy for ReciprocalRankFusion {
    fn name(&self) -> &str {
        "rrf"
    }

    fn fuse(&self, result_lists: &[Vec<RetrievedItem>]) -> Vec<RetrievedItem> {
        let k = f64::from(self.k);
        let mut acc = Accumulator::new();
        for list in result_lists {
            for (rank, item) in list.iter().enumerate() {
                acc.add(item, 1.0 / (k + rank as f64 + 1.0), 0.0);
            }
        }
        acc.finish(|score, _| score)
    }
}
