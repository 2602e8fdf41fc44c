//! Error display and code mapping.

use logbook_core::errors::{
    LogbookError, LogbookErrorCode, MigrationError, PipelineError, PipelineStage,
    RetrievalError, StorageError,
};

#[test]
fn cycle_error_lists_members() {
    let err = MigrationError::Cycle {
        members: vec!["a".into(), "b".into(), "a".into()],
    };
    assert_eq!(err.to_string(), "cyclic migration dependencies: a -> b -> a");
    assert!(err.is_configuration_error());
    assert_eq!(err.error_code(), "MIGRATION_CONFIG");
}

#[test]
fn rollback_not_implemented_is_not_config_error() {
    let err = MigrationError::RollbackNotImplemented { name: "001".into() };
    assert!(!err.is_configuration_error());
    assert_eq!(err.error_code(), "ROLLBACK_UNSUPPORTED");
}

#[test]
fn logbook_error_delegates_code() {
    let err: LogbookError = StorageError::Busy {
        message: "locked".into(),
    }
    .into();
    assert_eq!(err.error_code(), "DB_BUSY");
    assert_eq!(err.coded_string(), "[DB_BUSY] database busy: locked");
}

#[test]
fn pipeline_error_keeps_stage_and_source() {
    let inner: LogbookError = RetrievalError::SearchFailed {
        retriever: "keyword".into(),
        reason: "fts offline".into(),
    }
    .into();
    let err = PipelineError::stage_failed(PipelineStage::Retrieval, inner);
    assert_eq!(err.stage(), PipelineStage::Retrieval);
    assert!(err.to_string().starts_with("pipeline stage retrieval failed"));
    assert!(std::error::Error::source(&err).is_some());
}
