//! Rank fusion: combine ranked lists from several retrievers into one.
//!
//! Strategies are pure. The output order depends only on the input lists,
//! never on which retriever finished first.

pub mod rrf;
pub mod weighted;

use std::collections::HashMap;

use logbook_core::config::{FusionConfig, FusionKind};
use logbook_core::constants::{HYBRID_SOURCE, METADATA_SOURCES};
use logbook_core::models::RetrievedItem;

pub use rrf::ReciprocalRankFusion;
pub use weighted::WeightedFusion;

/// Combines several ranked lists into one ranked list.
pub trait FusionStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn fuse(&self, result_lists: &[Vec<RetrievedItem>]) -> Vec<RetrievedItem>;
}

/// Build the strategy selected in `config`.
pub fn from_config(config: &FusionConfig) -> Box<dyn FusionStrategy> {
    match config.strategy {
        FusionKind::Rrf => Box::new(ReciprocalRankFusion::new(config.rrf_k)),
        FusionKind::Weighted => Box::new(WeightedFusion::new(config.weights.clone())),
    }
}

struct Slot {
    item: RetrievedItem,
    sources: Vec<String>,
    score: f64,
    weight: f64,
}

/// Per-call accumulator keyed by entry id. Remembers first-seen order, which
/// is the tie-break for equal fused scores.
pub(crate) struct Accumulator {
    slots: Vec<Slot>,
    index: HashMap<String, usize>,
}

impl Accumulator {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub(crate) fn add(&mut self, item: &RetrievedItem, score: f64, weight: f64) {
        match self.index.get(item.entry_id()) {
            Some(&idx) => {
                let slot = &mut self.slots[idx];
                slot.score += score;
                slot.weight += weight;
                if !slot.sources.contains(&item.source) {
                    slot.sources.push(item.source.clone());
                }
            }
            None => {
                self.index.insert(item.entry_id().to_string(), self.slots.len());
                self.slots.push(Slot {
                    item: item.clone(),
                    sources: vec![item.source.clone()],
                    score,
                    weight,
                });
            }
        }
    }

    /// Fused items sorted by `final_score(score_sum, weight_sum)` descending.
    pub(crate) fn finish(self, final_score: impl Fn(f64, f64) -> f64) -> Vec<RetrievedItem> {
        let mut fused: Vec<RetrievedItem> = self
            .slots
            .into_iter()
            .map(|slot| {
                let mut item = slot.item;
                item.score = final_score(slot.score, slot.weight);
                item.source = HYBRID_SOURCE.to_string();
                item.metadata.insert(
                    METADATA_SOURCES.to_string(),
                    serde_json::Value::Array(
                        slot.sources.into_iter().map(serde_json::Value::String).collect(),
                    ),
                );
                item
            })
            .collect();
        // sort_by is stable: equal scores keep first-seen order.
        fused.sort_by(|a, b| b.score.total_cmp(&a.score));
        fused
    }
}
