//! Formatters: ProcessedResult -> FormattedResponse.

use logbook_core::config::FormatterOptions;
use logbook_core::errors::LogbookResult;
use logbook_core::models::{FormattedResponse, ProcessedResult, RetrievedItem};
use logbook_core::traits::Formatter;
use serde_json::{json, Value};

fn shown_items<'a>(
    result: &'a ProcessedResult,
    options: &FormatterOptions,
) -> impl Iterator<Item = &'a RetrievedItem> {
    let limit = if options.include_items {
        options.max_items.unwrap_or(usize::MAX)
    } else {
        0
    };
    result.items.iter().take(limit)
}

fn shown_reasoning<'a>(result: &'a ProcessedResult, options: &FormatterOptions) -> Option<&'a str> {
    if options.include_reasoning {
        result.reasoning.as_deref()
    } else {
        None
    }
}

/// `{answer, citations, items?, reasoning?}` as a JSON value.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(
        &self,
        result: &ProcessedResult,
        options: &FormatterOptions,
    ) -> LogbookResult<FormattedResponse> {
        let mut body = json!({
            "answer": result.answer,
            "citations": result.citations,
        });
        if options.include_items {
            let items: Vec<Value> = shown_items(result, options)
                .map(|item| {
                    json!({
                        "id": item.entry.id,
                        "source_system": item.entry.source_system,
                        "timestamp": item.entry.timestamp.to_rfc3339(),
                        "title": item.entry.title,
                        "author": item.entry.author,
                        "score": item.score,
                        "retrieved_by": item.sources(),
                    })
                })
                .collect();
            body["items"] = Value::Array(items);
        }
        if let Some(reasoning) = shown_reasoning(result, options) {
            body["reasoning"] = Value::String(reasoning.to_string());
        }
        Ok(FormattedResponse::Json(body))
    }
}

/// Human-readable answer with a sources list.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn format(
        &self,
        result: &ProcessedResult,
        options: &FormatterOptions,
    ) -> LogbookResult<FormattedResponse> {
        let mut out = result.answer.trim_end().to_string();
        out.push('\n');

        if let Some(reasoning) = shown_reasoning(result, options) {
            out.push_str("\n### Reasoning\n\n");
            out.push_str(reasoning.trim_end());
            out.push('\n');
        }

        let mut items = shown_items(result, options).peekable();
        if items.peek().is_some() {
            out.push_str("\n### Sources\n\n");
            for item in items {
                let entry = &item.entry;
                let title = entry.title.as_deref().unwrap_or("(untitled)");
                let cited = if result.citations.contains(&entry.id) {
                    " *(cited)*"
                } else {
                    ""
                };
                out.push_str(&format!(
                    "- **[#{}]** {} ({}, {}){cited}\n",
                    entry.id,
                    title,
                    entry.source_system,
                    entry.timestamp.format("%Y-%m-%d %H:%M UTC"),
                ));
            }
        }

        Ok(FormattedResponse::Markdown(out))
    }
}
