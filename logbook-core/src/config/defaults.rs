// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "logbook.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Retrieval ---
pub const DEFAULT_MAX_RESULTS: usize = 20;
pub const DEFAULT_RRF_K: u32 = 60;
pub const DEFAULT_SOURCE_WEIGHT: f64 = 1.0;

// --- Assembly ---
pub const DEFAULT_MAX_TOTAL_CHARS: usize = 12_000;
pub const DEFAULT_MAX_CHARS_PER_ITEM: usize = 2_000;

// --- Processor ---
pub const DEFAULT_MODEL_PROVIDER: &str = "openai";
pub const DEFAULT_MODEL_ID: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f64 = 0.0;
pub const DEFAULT_MAX_TOKENS: u32 = 1_024;

// --- Formatter ---
pub const DEFAULT_INCLUDE_ITEMS: bool = true;
pub const DEFAULT_INCLUDE_REASONING: bool = false;

// --- Ingestion ---
pub const DEFAULT_BASE_INTERVAL_SECS: f64 = 60.0;
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_MAX_INTERVAL_SECS: f64 = 3_600.0;
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 10;
pub const DEFAULT_REQUIRE_INITIAL_INGEST: bool = true;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
