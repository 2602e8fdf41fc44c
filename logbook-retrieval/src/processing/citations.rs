//! `[#id]` citation markers in generated answers.

use std::sync::LazyLock;

use logbook_core::models::{AssembledContext, CitationSet};
use regex::Regex;

static CITATION_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\[#(\w+)\]").ok());

/// Ids named by `[#id]` markers, unique, in first-seen order.
pub fn extract_citations(answer: &str) -> CitationSet {
    match CITATION_MARKER.as_ref() {
        Some(re) => re
            .captures_iter(answer)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect(),
        None => CitationSet::new(),
    }
}

/// Markers from `answer`, or every context entry id when there are none.
pub fn citations_or_context(answer: &str, context: &AssembledContext) -> CitationSet {
    let cited = extract_citations(answer);
    if cited.is_empty() {
        context.entry_ids().into_iter().collect()
    } else {
        cited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_are_deduplicated_in_order() {
        let cited = extract_citations("See [#b2] and [#a1], also [#b2] and [#bad id].");
        assert_eq!(cited.as_slice(), &["b2".to_string(), "a1".to_string()]);
    }

    #[test]
    fn plain_hash_without_brackets_is_ignored() {
        assert!(extract_citations("ticket #42 and [42]").is_empty());
    }
}
