use crate::config::FormatterOptions;
use crate::errors::LogbookResult;
use crate::models::{FormattedResponse, ProcessedResult};

/// Renders a processed result into the final response shape.
pub trait Formatter: Send + Sync {
    fn format(
        &self,
        result: &ProcessedResult,
        options: &FormatterOptions,
    ) -> LogbookResult<FormattedResponse>;
}
