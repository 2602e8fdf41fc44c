//! Named, dependency-ordered schema migrations.
//!
//! Each migration declares the migrations it depends on. The runner orders
//! them topologically, re-checks the `schema_migrations` table before each
//! one, and applies `up` + `mark_applied` in a single immediate transaction.

pub mod runner;
pub mod tracking;
pub mod v001_log_entries;
pub mod v002_log_entries_fts;
pub mod v003_ingestion_runs;
pub mod v004_enhancement_status;

use logbook_core::errors::{LogbookResult, MigrationError};
use rusqlite::Connection;

pub use runner::{ApplyReport, MigrationRunner};
pub use tracking::AppliedMigration;

/// One schema change. `up` bodies must be safe to re-run (create-if-not-exists).
pub trait Migration: Send + Sync {
    /// Unique identifier, also the key in `schema_migrations`.
    fn name(&self) -> &str;

    /// Names of migrations that must be applied first.
    fn depends_on(&self) -> Vec<&str> {
        Vec::new()
    }

    fn up(&self, conn: &Connection) -> LogbookResult<()>;

    /// Reverse `up`. Fails loudly unless a migration opts in.
    fn down(&self, _conn: &Connection) -> LogbookResult<()> {
        Err(MigrationError::RollbackNotImplemented {
            name: self.name().to_string(),
        }
        .into())
    }

    fn is_applied(&self, conn: &Connection) -> LogbookResult<bool> {
        tracking::is_applied(conn, self.name())
    }

    fn mark_applied(&self, conn: &Connection) -> LogbookResult<()> {
        tracking::mark_applied(conn, self.name())
    }

    fn mark_unapplied(&self, conn: &Connection) -> LogbookResult<()> {
        tracking::mark_unapplied(conn, self.name())
    }
}

impl std::fmt::Debug for dyn Migration + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migration").field("name", &self.name()).finish()
    }
}

/// The static migration registry, in declaration order.
pub fn registry() -> Vec<Box<dyn Migration>> {
    vec![
        Box::new(v001_log_entries::LogEntries),
        Box::new(v002_log_entries_fts::LogEntriesFts),
        Box::new(v003_ingestion_runs::IngestionRuns),
        Box::new(v004_enhancement_status::EnhancementStatus),
    ]
}

/// Apply every pending migration from the registry.
pub fn run_migrations(conn: &Connection) -> LogbookResult<ApplyReport> {
    MigrationRunner::with_registry().apply_all(conn)
}
