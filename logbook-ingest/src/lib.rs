//! # logbook-ingest
//!
//! Per-source ingestion: a polling loop that pulls new entries from an
//! adapter, persists them, runs enhancers, records every run, and backs off
//! exponentially on failure until a circuit breaker trips.

pub mod backoff;
pub mod scheduler;
pub mod stop;

pub use backoff::BackoffPolicy;
pub use scheduler::{
    EnhancementRetryReport, IngestionScheduler, SchedulerExit, SchedulerHandle, SchedulerState,
    SchedulerStatus,
};
pub use stop::StopSignal;
