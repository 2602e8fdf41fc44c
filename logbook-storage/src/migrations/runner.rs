//! MigrationRunner: topological ordering and exactly-once application.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use logbook_core::errors::{LogbookResult, MigrationError};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use rusqlite::Connection;
use tracing::{debug, info, info_span};

use super::{registry, tracking, AppliedMigration, Migration};
use crate::connection::writer::with_immediate_transaction;

/// What a call to [`MigrationRunner::apply_all`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
}

/// Applies a fixed set of migrations in dependency order.
pub struct MigrationRunner {
    migrations: Vec<Box<dyn Migration>>,
}

impl MigrationRunner {
    pub fn new(migrations: Vec<Box<dyn Migration>>) -> Self {
        Self { migrations }
    }

    /// Runner over the static registry.
    pub fn with_registry() -> Self {
        Self::new(registry())
    }

    /// Dependency order: every migration after all of its dependencies,
    /// registry order among independent ones.
    ///
    /// Duplicate names, unknown dependencies and cycles are reported here,
    /// before anything touches the database.
    pub fn plan(&self) -> Result<Vec<&dyn Migration>, MigrationError> {
        let count = self.migrations.len();
        let mut graph: DiGraph<(), ()> = DiGraph::with_capacity(count, count);
        let mut by_name: HashMap<&str, NodeIndex> = HashMap::with_capacity(count);

        for migration in &self.migrations {
            let node = graph.add_node(());
            if by_name.insert(migration.name(), node).is_some() {
                return Err(MigrationError::DuplicateName {
                    name: migration.name().to_string(),
                });
            }
        }

        // Edge dependency -> dependent. Node index == registry index.
        for (idx, migration) in self.migrations.iter().enumerate() {
            for dependency in migration.depends_on() {
                let Some(&dep_node) = by_name.get(dependency) else {
                    return Err(MigrationError::UnknownDependency {
                        migration: migration.name().to_string(),
                        dependency: dependency.to_string(),
                    });
                };
                graph.add_edge(dep_node, NodeIndex::new(idx), ());
            }
        }

        for component in tarjan_scc(&graph) {
            let self_loop = component.len() == 1 && graph.contains_edge(component[0], component[0]);
            if component.len() > 1 || self_loop {
                let mut indices: Vec<usize> = component.iter().map(|n| n.index()).collect();
                indices.sort_unstable();
                let mut members: Vec<String> = indices
                    .iter()
                    .map(|&i| self.migrations[i].name().to_string())
                    .collect();
                members.push(members[0].clone());
                return Err(MigrationError::Cycle { members });
            }
        }

        // Kahn's algorithm; the min-heap keeps registry order for ties.
        let mut in_degree: Vec<usize> = graph
            .node_indices()
            .map(|n| graph.neighbors_directed(n, Direction::Incoming).count())
            .collect();
        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(idx, _)| Reverse(idx))
            .collect();

        let mut order = Vec::with_capacity(count);
        while let Some(Reverse(idx)) = ready.pop() {
            order.push(self.migrations[idx].as_ref());
            for next in graph.neighbors_directed(NodeIndex::new(idx), Direction::Outgoing) {
                let j = next.index();
                in_degree[j] -= 1;
                if in_degree[j] == 0 {
                    ready.push(Reverse(j));
                }
            }
        }

        Ok(order)
    }

    /// Apply every migration that is not recorded as applied.
    ///
    /// Applied state is re-read from the tracking table for every migration,
    /// inside the same immediate transaction as `up` and `mark_applied`, so
    /// a crash can never leave a migration applied but unrecorded.
    pub fn apply_all(&self, conn: &Connection) -> LogbookResult<ApplyReport> {
        let span = info_span!("migrations.apply", registered = self.migrations.len());
        let _guard = span.enter();

        let plan = self.plan()?;
        tracking::ensure_table(conn)?;

        let mut report = ApplyReport::default();
        for migration in plan {
            let name = migration.name().to_string();
            let applied_now = with_immediate_transaction(conn, |tx| {
                if migration.is_applied(tx)? {
                    return Ok(false);
                }
                migration.up(tx).map_err(|e| MigrationError::Failed {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
                migration.mark_applied(tx)?;
                Ok(true)
            })?;

            if applied_now {
                info!(migration = %name, "applied migration");
                report.applied.push(name);
            } else {
                debug!(migration = %name, "migration already applied");
                report.skipped.push(name);
            }
        }

        Ok(report)
    }

    /// Names of migrations not yet applied, in the order they would run.
    pub fn pending(&self, conn: &Connection) -> LogbookResult<Vec<String>> {
        let plan = self.plan()?;
        tracking::ensure_table(conn)?;
        let mut pending = Vec::new();
        for migration in plan {
            if !migration.is_applied(conn)? {
                pending.push(migration.name().to_string());
            }
        }
        Ok(pending)
    }

    /// Every applied migration, in application order.
    pub fn applied_migrations(&self, conn: &Connection) -> LogbookResult<Vec<AppliedMigration>> {
        tracking::ensure_table(conn)?;
        tracking::applied(conn)
    }

    /// Roll back one migration with its `down` body.
    ///
    /// Refuses while an applied migration depends on it. Returns `false`
    /// when the migration was not applied in the first place.
    pub fn rollback(&self, conn: &Connection, name: &str) -> LogbookResult<bool> {
        let target = self
            .migrations
            .iter()
            .find(|m| m.name() == name)
            .ok_or_else(|| MigrationError::NotRegistered {
                name: name.to_string(),
            })?;
        tracking::ensure_table(conn)?;

        let mut dependents = Vec::new();
        for migration in &self.migrations {
            if migration.depends_on().contains(&name) && migration.is_applied(conn)? {
                dependents.push(migration.name().to_string());
            }
        }
        if !dependents.is_empty() {
            return Err(MigrationError::HasAppliedDependents {
                name: name.to_string(),
                dependents,
            }
            .into());
        }

        let rolled_back = with_immediate_transaction(conn, |tx| {
            if !target.is_applied(tx)? {
                return Ok(false);
            }
            target.down(tx)?;
            target.mark_unapplied(tx)?;
            Ok(true)
        })?;

        if rolled_back {
            info!(migration = %name, "rolled back migration");
        }
        Ok(rolled_back)
    }
}
