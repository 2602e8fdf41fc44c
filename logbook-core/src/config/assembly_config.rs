use serde::{Deserialize, Serialize};

use super::defaults;

/// Character budgets for context assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Upper bound on the assembled text length, in characters.
    pub max_total_chars: usize,
    /// Upper bound on a single rendered item. `None` disables the per-item cap.
    pub max_chars_per_item: Option<usize>,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            max_total_chars: defaults::DEFAULT_MAX_TOTAL_CHARS,
            max_chars_per_item: Some(defaults::DEFAULT_MAX_CHARS_PER_ITEM),
        }
    }
}
