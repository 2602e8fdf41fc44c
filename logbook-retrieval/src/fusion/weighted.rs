//! Weighted score fusion: weighted mean of raw scores per entry.

use std::collections::BTreeMap;

use logbook_core::config::defaults::DEFAULT_SOURCE_WEIGHT;
use logbook_core::models::RetrievedItem;

use super::{Accumulator, FusionStrategy};

/// Final score = Σ(score × weight) / Σ weight over the lists that returned
/// the entry. A list's weight is looked up by its first item's `source`.
#[derive(Debug, Clone, Default)]
pub struct WeightedFusion {
    weights: BTreeMap<String, f64>,
}

impl WeightedFusion {
    pub fn new(weights: BTreeMap<String, f64>) -> Self {
        Self { weights }
    }

    pub fn with_weight(mut self, source: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(source.into(), weight);
        self
    }

    pub fn weight_for(&self, source: &str) -> f64 {
        self.weights.get(source).copied().unwrap_or(DEFAULT_SOURCE_WEIGHT)
    }
}

impl FusionStrategy for WeightedFusion {
    fn name(&self) -> &str {
        "weighted"
    }

    fn fuse(&self, result_lists: &[Vec<RetrievedItem>]) -> Vec<RetrievedItem> {
        let mut acc = Accumulator::new();
        for list in result_lists {
            let Some(first) = list.first() else {
                continue;
            };
            let weight = self.weight_for(&first.source);
            for item in list {
                acc.add(item, item.score * weight, weight);
            }
        }
        acc.finish(|score_sum, weight_sum| {
            if weight_sum == 0.0 {
                0.0
            } else {
                score_sum / weight_sum
            }
        })
    }
}
