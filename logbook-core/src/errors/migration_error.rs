use super::error_code::{self, LogbookErrorCode};

/// Schema migration errors.
///
/// `Cycle`, `UnknownDependency` and `DuplicateName` are configuration errors:
/// they are raised before any migration body runs.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("cyclic migration dependencies: {}", members.join(" -> "))]
    Cycle { members: Vec<String> },

    #[error("migration {migration} depends on unknown migration {dependency}")]
    UnknownDependency { migration: String, dependency: String },

    #[error("migration {name} is registered more than once")]
    DuplicateName { name: String },

    #[error("migration {name} failed: {reason}")]
    Failed { name: String, reason: String },

    #[error("migration {name} does not implement rollback")]
    RollbackNotImplemented { name: String },

    #[error("cannot roll back {name}: applied migrations depend on it: {}", dependents.join(", "))]
    HasAppliedDependents { name: String, dependents: Vec<String> },

    #[error("migration {name} is not registered")]
    NotRegistered { name: String },
}

impl MigrationError {
    /// True for errors that stem from the static registry rather than the store.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::Cycle { .. } | Self::UnknownDependency { .. } | Self::DuplicateName { .. }
        )
    }
}

impl LogbookErrorCode for MigrationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Cycle { .. } | Self::UnknownDependency { .. } | Self::DuplicateName { .. } => {
                error_code::MIGRATION_CONFIG
            }
            Self::RollbackNotImplemented { .. } | Self::HasAppliedDependents { .. } => {
                error_code::ROLLBACK_UNSUPPORTED
            }
            Self::Failed { .. } | Self::NotRegistered { .. } => error_code::MIGRATION_FAILED,
        }
    }
}
