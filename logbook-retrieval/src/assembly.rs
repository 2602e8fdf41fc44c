//! DefaultAssembler: ranked items to size-bounded context text.

use logbook_core::config::AssemblyConfig;
use logbook_core::errors::LogbookResult;
use logbook_core::models::{AssembledContext, RetrievedItem};
use logbook_core::traits::Assembler;
use tracing::debug;

/// Blank line closing every rendered block.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Renders one item into its context block, trailing separator included.
pub type ItemRenderer = Box<dyn Fn(&RetrievedItem) -> String + Send + Sync>;

/// `[#id] timestamp | author | title`, then the content, then a blank line.
pub fn render_item(item: &RetrievedItem) -> String {
    let entry = &item.entry;
    let mut header = format!("[#{}] {}", entry.id, entry.timestamp.to_rfc3339());
    if let Some(author) = &entry.author {
        header.push_str(" | ");
        header.push_str(author);
    }
    if let Some(title) = &entry.title {
        header.push_str(" | ");
        header.push_str(title);
    }
    format!("{header}\n{}{BLOCK_SEPARATOR}", entry.content)
}

/// First `max_chars` characters of `text`.
fn clip(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Clip a block to `max_chars`, keeping its trailing separator so the next
/// block's header still starts on its own line.
fn clip_block(block: &str, max_chars: usize) -> String {
    let separator_len = BLOCK_SEPARATOR.chars().count();
    match block.strip_suffix(BLOCK_SEPARATOR) {
        Some(body) if max_chars > separator_len => {
            let mut clipped = clip(body, max_chars - separator_len);
            clipped.push_str(BLOCK_SEPARATOR);
            clipped
        }
        _ => clip(block, max_chars),
    }
}

/// Packs rendered items in rank order under two budgets.
///
/// An item longer than `max_chars_per_item` is clipped to it, separator
/// kept. The item that
/// overflows `max_total_chars` is clipped to the remaining room and every
/// later item is dropped. Budgets count characters, not bytes.
pub struct DefaultAssembler {
    render: ItemRenderer,
}

impl DefaultAssembler {
    pub fn new() -> Self {
        Self::with_renderer(render_item)
    }

    pub fn with_renderer<F>(render: F) -> Self
    where
        F: Fn(&RetrievedItem) -> String + Send + Sync + 'static,
    {
        Self {
            render: Box::new(render),
        }
    }
}

impl Default for DefaultAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler for DefaultAssembler {
    fn assemble(
        &self,
        items: Vec<RetrievedItem>,
        config: &AssemblyConfig,
    ) -> LogbookResult<AssembledContext> {
        let candidates = items.len();
        let mut text = String::new();
        let mut used = 0usize;
        let mut kept = Vec::with_capacity(candidates);
        let mut truncated = false;

        for item in items {
            let remaining = config.max_total_chars.saturating_sub(used);
            if remaining == 0 {
                truncated = true;
                break;
            }

            let mut block = (self.render)(&item);
            let mut len = block.chars().count();
            if let Some(cap) = config.max_chars_per_item {
                if len > cap {
                    block = clip_block(&block, cap);
                    len = cap;
                    truncated = true;
                }
            }

            if len > remaining {
                text.push_str(&clip(&block, remaining));
                used += remaining;
                kept.push(item);
                truncated = true;
                break;
            }

            text.push_str(&block);
            used += len;
            kept.push(item);
        }

        debug!(
            candidates,
            kept = kept.len(),
            chars = used,
            truncated,
            "assembled context"
        );
        Ok(AssembledContext::new(kept, text, truncated))
    }
}
