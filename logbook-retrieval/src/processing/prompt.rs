//! Prompt layout for the single-LLM processor.

use logbook_core::models::AssembledContext;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You answer questions using only the logbook entries \
provided below. Cite every entry you rely on with its marker, for example [#entry-id]. \
If the entries do not contain the answer, say so.";

pub fn build_prompt(query: &str, context: &AssembledContext, system_prompt: Option<&str>) -> String {
    format!(
        "{}\n\nLogbook entries:\n{}\nQuestion: {}\nAnswer:",
        system_prompt.unwrap_or(DEFAULT_SYSTEM_PROMPT),
        context.text(),
        query.trim()
    )
}
