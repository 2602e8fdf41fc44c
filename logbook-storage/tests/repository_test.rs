//! SqliteRepository against in-memory and file-backed databases.

use std::sync::Arc;

use chrono::Duration;
use logbook_core::errors::{LogbookError, StorageError};
use logbook_core::models::{EnhancementState, RunCounts, RunStatus, UpsertOutcome};
use logbook_core::traits::IngestionRepository;
use logbook_storage::queries::entry_search;
use logbook_storage::{DatabaseManager, MigrationRunner, SqliteRepository};
use test_fixtures::{base_time, entry, entry_at};

fn repo() -> SqliteRepository {
    SqliteRepository::new(Arc::new(DatabaseManager::open_in_memory().unwrap()))
}

fn search(repo: &SqliteRepository, query: &str) -> Vec<String> {
    repo.database()
        .with_reader(|conn| entry_search::search(conn, query, 10, None, None))
        .unwrap()
        .into_iter()
        .map(|(e, _)| e.id)
        .collect()
}

#[test]
fn upsert_reports_insert_unchanged_update() {
    let repo = repo();
    let original = entry("e1", "pump 3 tripped").with_tags(["ops"]);

    assert_eq!(repo.upsert_entry(&original).unwrap(), UpsertOutcome::Inserted);
    assert_eq!(repo.upsert_entry(&original).unwrap(), UpsertOutcome::Unchanged);

    let edited = entry("e1", "pump 3 tripped, reset at 04:10").with_tags(["ops"]);
    assert_eq!(repo.upsert_entry(&edited).unwrap(), UpsertOutcome::Updated);
    assert_eq!(repo.count_entries().unwrap(), 1);
    assert_eq!(repo.get_entry("e1").unwrap(), Some(edited));
}

#[test]
fn stored_entry_roundtrips_every_field() {
    let repo = repo();
    let mut original = entry_at("e2", "valve inspection", 90)
        .with_author("dana")
        .with_title("Inspection")
        .with_tags(["maintenance", "valves"]);
    original
        .metadata
        .insert("shift".to_string(), serde_json::json!("night"));

    repo.upsert_entry(&original).unwrap();

    assert_eq!(repo.get_entry("e2").unwrap(), Some(original));
    assert_eq!(repo.get_entry("missing").unwrap(), None);
}

#[test]
fn full_text_search_matches_any_token() {
    let repo = repo();
    repo.upsert_entry(&entry("a", "disk full on node 7")).unwrap();
    repo.upsert_entry(&entry("b", "network latency spike")).unwrap();
    repo.upsert_entry(&entry("c", "replaced disk in rack 2")).unwrap();

    let mut hits = search(&repo, "disk");
    hits.sort();
    assert_eq!(hits, vec!["a", "c"]);

    let mut either = search(&repo, "latency disk");
    either.sort();
    assert_eq!(either, vec!["a", "b", "c"]);
}

#[test]
fn search_treats_operators_as_plain_words() {
    let repo = repo();
    repo.upsert_entry(&entry("a", "disk full")).unwrap();

    assert_eq!(search(&repo, "disk AND (NEAR"), vec!["a"]);
    assert!(search(&repo, "\"*:()").is_empty());
    assert!(search(&repo, "").is_empty());
}

#[test]
fn search_respects_time_window() {
    let repo = repo();
    repo.upsert_entry(&entry_at("early", "boiler alarm", 0)).unwrap();
    repo.upsert_entry(&entry_at("late", "boiler alarm again", 120)).unwrap();

    let start = base_time() + Duration::minutes(60);
    let hits = repo
        .database()
        .with_reader(|conn| entry_search::search(conn, "boiler", 10, Some(&start), None))
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].0.id, "late");
}

#[test]
fn update_reindexes_content() {
    let repo = repo();
    repo.upsert_entry(&entry("a", "compressor noise")).unwrap();
    repo.upsert_entry(&entry("a", "fan vibration")).unwrap();

    assert!(search(&repo, "compressor").is_empty());
    assert_eq!(search(&repo, "vibration"), vec!["a"]);
}

#[test]
fn last_successful_run_ignores_failed_and_other_sources() {
    let repo = repo();
    assert_eq!(repo.last_successful_run("jira").unwrap(), None);

    let done = repo.start_ingestion_run("jira").unwrap();
    repo.complete_ingestion_run(
        &done,
        &RunCounts {
            added: 3,
            ..RunCounts::default()
        },
    )
    .unwrap();
    let failed = repo.start_ingestion_run("jira").unwrap();
    repo.fail_ingestion_run(&failed, "timeout").unwrap();
    let other = repo.start_ingestion_run("slack").unwrap();
    repo.complete_ingestion_run(&other, &RunCounts::default()).unwrap();

    let runs = repo.recent_runs(Some("jira"), 10).unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].status, RunStatus::Failed);
    assert_eq!(runs[0].error.as_deref(), Some("timeout"));
    assert_eq!(runs[1].status, RunStatus::Completed);
    assert_eq!(runs[1].counts.added, 3);

    assert_eq!(
        repo.last_successful_run("jira").unwrap(),
        Some(runs[1].started_at)
    );
}

#[test]
fn completing_unknown_run_is_not_found() {
    let repo = repo();
    let err = repo
        .complete_ingestion_run("nope", &RunCounts::default())
        .unwrap_err();
    assert!(matches!(
        err,
        LogbookError::Storage(StorageError::NotFound { .. })
    ));
}

#[test]
fn enhancement_status_tracks_latest_attempt() {
    let repo = repo();
    repo.upsert_entry(&entry("a", "alpha")).unwrap();
    repo.upsert_entry(&entry("b", "beta")).unwrap();

    repo.mark_enhancement_failed("a", "summarizer", "model timeout").unwrap();
    repo.mark_enhancement_complete("b", "summarizer").unwrap();

    let failed = repo.failed_enhancements("summarizer", 10).unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].id, "a");
    assert!(repo.failed_enhancements("indexer", 10).unwrap().is_empty());

    repo.mark_enhancement_complete("a", "summarizer").unwrap();
    assert!(repo.failed_enhancements("summarizer", 10).unwrap().is_empty());

    let status = repo.enhancement_status("a").unwrap();
    assert_eq!(status.len(), 1);
    assert_eq!(status[0].state, EnhancementState::Complete);
    assert_eq!(status[0].attempts, 2);
    assert_eq!(status[0].error, None);
}

#[test]
fn file_backed_database_persists_and_reads_through_pool() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logbook.db");

    {
        let db = Arc::new(DatabaseManager::open(&path, 2).unwrap());
        let repo = SqliteRepository::new(db);
        repo.upsert_entry(&entry("a", "persisted across restarts")).unwrap();
        assert_eq!(search(&repo, "restarts"), vec!["a"]);
    }

    let db = DatabaseManager::open(&path, 2).unwrap();
    assert_eq!(db.path(), Some(path.as_path()));
    let pending = db
        .with_writer(|conn| MigrationRunner::with_registry().pending(conn))
        .unwrap();
    assert!(pending.is_empty());

    let repo = SqliteRepository::new(Arc::new(db));
    assert_eq!(repo.count_entries().unwrap(), 1);
}

mod match_expression {
    use logbook_storage::queries::entry_search::to_match_expression;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn every_term_is_quoted_word(query in ".{0,64}") {
            if let Some(expr) = to_match_expression(&query) {
                for term in expr.split(" OR ") {
                    prop_assert!(term.len() >= 3);
                    prop_assert!(term.starts_with('"') && term.ends_with('"'));
                    let inner = &term[1..term.len() - 1];
                    prop_assert!(inner.chars().all(|c| c.is_alphanumeric() || c == '_'));
                }
            }
        }
    }
}
