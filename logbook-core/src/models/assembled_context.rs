//! AssembledContext: the size-bounded text handed to a processor.

use serde::{Deserialize, Serialize};

use super::retrieved_item::RetrievedItem;

/// Context text built from ranked items. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledContext {
    items: Vec<RetrievedItem>,
    text: String,
    total_chars: usize,
    truncated: bool,
}

impl AssembledContext {
    /// Build a context. `total_chars` is derived from `text` so the two
    /// can never disagree.
    pub fn new(items: Vec<RetrievedItem>, text: String, truncated: bool) -> Self {
        let total_chars = text.chars().count();
        Self {
            items,
            text,
            total_chars,
            truncated,
        }
    }

    pub fn empty(truncated: bool) -> Self {
        Self::new(Vec::new(), String::new(), truncated)
    }

    pub fn items(&self) -> &[RetrievedItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<RetrievedItem> {
        self.items
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    /// At least one candidate was dropped or clipped to fit a budget.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn entry_ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.entry.id.clone()).collect()
    }
}
