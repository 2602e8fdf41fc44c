use serde::{Deserialize, Serialize};

use super::defaults;

/// Options understood by the bundled formatters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterOptions {
    /// Render the retrieved items alongside the answer.
    pub include_items: bool,
    /// Render the processor's reasoning, when present.
    pub include_reasoning: bool,
    /// Cap on rendered items. `None` renders all of them.
    pub max_items: Option<usize>,
}

impl Default for FormatterOptions {
    fn default() -> Self {
        Self {
            include_items: defaults::DEFAULT_INCLUDE_ITEMS,
            include_reasoning: defaults::DEFAULT_INCLUDE_REASONING,
            max_items: None,
        }
    }
}
