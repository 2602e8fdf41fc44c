/// `source` value stamped on every fused item.
pub const HYBRID_SOURCE: &str = "hybrid";

/// Metadata key listing the retrievers that contributed to a fused item.
pub const METADATA_SOURCES: &str = "sources";

/// Answer returned when the assembled context holds no items.
pub const INSUFFICIENT_INFORMATION_ANSWER: &str =
    "I don't have enough information in the logbook to answer this question.";

/// Prefix of the degraded answer returned when text generation fails.
pub const GENERATION_FAILED_PREFIX: &str = "Unable to generate an answer";

/// Name of the persisted migration tracking table.
pub const MIGRATIONS_TABLE: &str = "schema_migrations";
