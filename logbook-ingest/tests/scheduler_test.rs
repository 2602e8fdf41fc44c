//! IngestionScheduler against scripted adapters and both repositories.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::Duration as ChronoDuration;
use logbook_core::config::IngestionConfig;
use logbook_core::errors::{ConfigError, IngestionError, LogbookError};
use logbook_core::models::{EnhancementState, RunStatus};
use logbook_core::traits::{Enhancer, IngestionRepository};
use logbook_ingest::{IngestionScheduler, SchedulerExit, SchedulerState};
use logbook_storage::{DatabaseManager, SqliteRepository};
use test_fixtures::{
    base_time, entry, entry_at, InMemoryRepository, RecordingEnhancer, ScriptStep,
    ScriptedAdapter,
};

fn fast_config() -> IngestionConfig {
    IngestionConfig {
        base_interval_secs: 0.001,
        backoff_multiplier: 2.0,
        max_interval_secs: 0.01,
        max_consecutive_failures: 3,
        require_initial_ingest: false,
        ..IngestionConfig::for_source("test")
    }
}

fn scheduler(
    config: IngestionConfig,
    adapter: &Arc<ScriptedAdapter>,
    repo: &Arc<InMemoryRepository>,
) -> IngestionScheduler {
    IngestionScheduler::new(config, adapter.clone(), repo.clone()).unwrap()
}

#[test]
fn circuit_opens_after_three_failures_without_a_fourth_attempt() {
    let adapter = Arc::new(ScriptedAdapter::always_failing("test", "connection refused"));
    let repo = Arc::new(InMemoryRepository::new());
    let scheduler = scheduler(fast_config(), &adapter, &repo);

    let exit = scheduler.start();

    assert_eq!(exit, SchedulerExit::CircuitOpen { consecutive_failures: 3 });
    assert_eq!(adapter.calls(), 3);
    let status = scheduler.status();
    assert_eq!(status.state, SchedulerState::CircuitOpen);
    assert_eq!(status.consecutive_failures, 3);
    assert!(status.last_error.unwrap().contains("connection refused"));
    assert!(repo.runs().iter().all(|r| r.status == RunStatus::Failed));
}

#[test]
fn success_resets_the_failure_counter() {
    let adapter = Arc::new(ScriptedAdapter::new(
        "test",
        vec![
            ScriptStep::Unavailable("down".into()),
            ScriptStep::Unavailable("down".into()),
            ScriptStep::Entries(vec![entry("e1", "ok")]),
            ScriptStep::Unavailable("down".into()),
            ScriptStep::Unavailable("down".into()),
            ScriptStep::Unavailable("down".into()),
        ],
    ));
    let repo = Arc::new(InMemoryRepository::new());
    let scheduler = scheduler(fast_config(), &adapter, &repo);

    let exit = scheduler.start();

    // Two failures, a success, then three more before tripping.
    assert_eq!(exit, SchedulerExit::CircuitOpen { consecutive_failures: 3 });
    assert_eq!(adapter.calls(), 6);
    assert_eq!(scheduler.status().last_result.unwrap().entries_added, 1);
}

#[test]
fn poll_skips_until_an_initial_ingest_exists() {
    let adapter = Arc::new(ScriptedAdapter::new("test", vec![]));
    let repo = Arc::new(InMemoryRepository::new());
    let config = IngestionConfig {
        require_initial_ingest: true,
        ..fast_config()
    };
    let scheduler = scheduler(config, &adapter, &repo);

    let result = scheduler.poll_once().unwrap();

    assert_eq!(result.entries_seen(), 0);
    assert_eq!(result.since, None);
    assert_eq!(adapter.calls(), 0);
    assert!(repo.runs().is_empty());
}

#[test]
fn full_ingest_bypasses_the_guard_and_unlocks_polling() {
    let adapter = Arc::new(ScriptedAdapter::new(
        "test",
        vec![
            ScriptStep::Entries(vec![entry("e1", "first"), entry("e2", "second")]),
            ScriptStep::Entries(vec![entry("e3", "third")]),
        ],
    ));
    let repo = Arc::new(InMemoryRepository::new());
    let config = IngestionConfig {
        require_initial_ingest: true,
        ..fast_config()
    };
    let scheduler = scheduler(config, &adapter, &repo);
    let until = base_time() + ChronoDuration::days(1);

    let full = scheduler.full_ingest(Some(until)).unwrap();
    assert_eq!(full.entries_added, 2);
    assert_eq!(adapter.windows()[0], (None, Some(until)));

    let polled = scheduler.poll_once().unwrap();
    assert_eq!(polled.entries_added, 1);
    assert!(polled.since.is_some());
    assert_eq!(adapter.calls(), 2);
}

#[test]
fn poll_fetches_from_the_last_successful_run() {
    let adapter = Arc::new(ScriptedAdapter::new("test", vec![]));
    let repo = Arc::new(InMemoryRepository::new());
    let last = base_time() + ChronoDuration::hours(6);
    repo.seed_completed_run("test", base_time());
    repo.seed_completed_run("test", last);
    repo.seed_completed_run("other-source", last + ChronoDuration::hours(1));
    let scheduler = scheduler(fast_config(), &adapter, &repo);

    let result = scheduler.poll_once().unwrap();

    assert_eq!(result.since, Some(last));
    assert_eq!(adapter.windows(), vec![(Some(last), None)]);
}

#[test]
fn poll_counts_added_updated_and_unchanged() {
    let adapter = Arc::new(ScriptedAdapter::new(
        "test",
        vec![
            ScriptStep::Entries(vec![entry("e1", "one"), entry("e2", "two")]),
            ScriptStep::Entries(vec![
                entry("e1", "one"),
                entry("e2", "two, revised"),
                entry("e3", "three"),
            ]),
        ],
    ));
    let repo = Arc::new(InMemoryRepository::new());
    let scheduler = scheduler(fast_config(), &adapter, &repo);

    scheduler.poll_once().unwrap();
    let second = scheduler.poll_once().unwrap();

    assert_eq!(second.entries_added, 1);
    assert_eq!(second.entries_updated, 1);
    assert_eq!(second.entries_unchanged, 1);
    assert_eq!(second.entries_failed, 0);
    let last_run = repo.runs().last().cloned().unwrap();
    assert_eq!(last_run.status, RunStatus::Completed);
    assert_eq!(last_run.counts.added, 1);
    assert_eq!(last_run.counts.unchanged, 1);
}

#[test]
fn enhancer_failures_are_isolated_per_entry_and_enhancer() {
    let adapter = Arc::new(ScriptedAdapter::new(
        "test",
        vec![ScriptStep::Entries(vec![
            entry("e1", "one"),
            entry("e2", "two"),
            entry("e3", "three"),
        ])],
    ));
    let repo = Arc::new(InMemoryRepository::new());
    let flaky = Arc::new(RecordingEnhancer::failing_for("summarize", &["e2"]));
    let steady = Arc::new(RecordingEnhancer::new("index"));
    let scheduler = scheduler(fast_config(), &adapter, &repo)
        .with_enhancer(flaky.clone())
        .with_enhancer(steady.clone());

    let result = scheduler.poll_once().unwrap();

    assert_eq!(result.entries_added, 3);
    assert_eq!(flaky.seen(), vec!["e1", "e2", "e3"]);
    assert_eq!(steady.seen(), vec!["e1", "e2", "e3"]);

    let failed = repo.enhancement("e2", "summarize").unwrap();
    assert_eq!(failed.state, EnhancementState::Failed);
    assert!(failed.error.unwrap().contains("rejected"));
    assert_eq!(
        repo.enhancement("e3", "summarize").unwrap().state,
        EnhancementState::Complete
    );
    assert_eq!(
        repo.enhancement("e2", "index").unwrap().state,
        EnhancementState::Complete
    );
    assert_eq!(repo.runs()[0].counts.enhancements_failed, 1);
}

#[test]
fn stream_failure_fails_the_run_and_propagates() {
    let adapter = Arc::new(ScriptedAdapter::new(
        "test",
        vec![ScriptStep::BreakAfter(
            vec![entry("e1", "kept")],
            "socket reset".into(),
        )],
    ));
    let repo = Arc::new(InMemoryRepository::new());
    let scheduler = scheduler(fast_config(), &adapter, &repo);

    let err = scheduler.poll_once().unwrap_err();

    assert!(matches!(
        err,
        LogbookError::Ingestion(IngestionError::StreamFailed { .. })
    ));
    let run = repo.runs()[0].clone();
    assert_eq!(run.status, RunStatus::Failed);
    assert!(run.error.unwrap().contains("socket reset"));
    // Entries streamed before the failure stay persisted.
    assert_eq!(repo.entries().len(), 1);
    assert_eq!(repo.last_successful_run("test").unwrap(), None);
}

#[test]
fn failed_run_completion_marks_the_run_failed() {
    let adapter = Arc::new(ScriptedAdapter::new(
        "test",
        vec![ScriptStep::Entries(vec![entry("e1", "one")])],
    ));
    let repo = Arc::new(InMemoryRepository::new());
    repo.reject_run_completions();
    let scheduler = scheduler(fast_config(), &adapter, &repo);

    let err = scheduler.poll_once().unwrap_err();

    assert!(matches!(err, LogbookError::Storage(_)));
    let runs = repo.runs();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, RunStatus::Failed);
    assert!(runs[0].error.as_deref().unwrap().contains("disk I/O error"));
    assert_eq!(repo.last_successful_run("test").unwrap(), None);
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let adapter = Arc::new(ScriptedAdapter::new("test", vec![]));
    let repo = Arc::new(InMemoryRepository::new());
    let config = IngestionConfig {
        base_interval_secs: -5.0,
        ..fast_config()
    };

    let err = IngestionScheduler::new(config, adapter, repo).err().unwrap();

    assert!(matches!(err, LogbookError::Config(ConfigError::ValidationFailed { .. })));
}

#[test]
fn upsert_failure_is_counted_and_skips_enhancement() {
    let adapter = Arc::new(ScriptedAdapter::new(
        "test",
        vec![ScriptStep::Entries(vec![entry("e1", "one"), entry("bad", "two")])],
    ));
    let repo = Arc::new(InMemoryRepository::new());
    repo.reject_upserts_of("bad");
    let enhancer = Arc::new(RecordingEnhancer::new("index"));
    let scheduler = scheduler(fast_config(), &adapter, &repo).with_enhancer(enhancer.clone());

    let result = scheduler.poll_once().unwrap();

    assert_eq!(result.entries_added, 1);
    assert_eq!(result.entries_failed, 1);
    assert_eq!(enhancer.seen(), vec!["e1"]);
    assert_eq!(repo.runs()[0].status, RunStatus::Completed);
}

#[test]
fn fetch_limit_is_passed_to_the_adapter() {
    let adapter = Arc::new(ScriptedAdapter::new(
        "test",
        vec![ScriptStep::Entries(
            (0..10).map(|i| entry_at(&format!("e{i}"), "x", i)).collect(),
        )],
    ));
    let repo = Arc::new(InMemoryRepository::new());
    let config = IngestionConfig {
        fetch_limit: Some(4),
        ..fast_config()
    };
    let scheduler = scheduler(config, &adapter, &repo);

    assert_eq!(scheduler.poll_once().unwrap().entries_added, 4);
}

#[test]
fn stop_interrupts_a_long_sleep() {
    let adapter = Arc::new(ScriptedAdapter::new("test", vec![]));
    let repo = Arc::new(InMemoryRepository::new());
    let config = IngestionConfig {
        base_interval_secs: 3_600.0,
        max_interval_secs: 3_600.0,
        ..fast_config()
    };
    let scheduler = Arc::new(scheduler(config, &adapter, &repo));
    let handle = scheduler.clone().spawn().unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while scheduler.status().state != SchedulerState::Sleeping {
        assert!(Instant::now() < deadline, "scheduler never went to sleep");
        thread::sleep(Duration::from_millis(5));
    }

    let stopped_at = Instant::now();
    handle.stop();
    let exit = handle.join().unwrap();

    assert_eq!(exit, SchedulerExit::Stopped);
    assert!(stopped_at.elapsed() < Duration::from_secs(5));
    assert_eq!(adapter.calls(), 1);
    assert_eq!(scheduler.status().state, SchedulerState::Stopped);
}

#[test]
fn stopped_before_start_never_polls() {
    let adapter = Arc::new(ScriptedAdapter::new("test", vec![]));
    let repo = Arc::new(InMemoryRepository::new());
    let scheduler = scheduler(fast_config(), &adapter, &repo);

    scheduler.stop();

    assert_eq!(scheduler.start(), SchedulerExit::Stopped);
    assert_eq!(adapter.calls(), 0);
}

#[test]
fn source_system_falls_back_to_the_adapter() {
    let adapter = Arc::new(ScriptedAdapter::new("shift-notes", vec![]));
    let repo = Arc::new(InMemoryRepository::new());
    let config = IngestionConfig {
        source_system: String::new(),
        ..fast_config()
    };
    let scheduler = scheduler(config, &adapter, &repo);

    scheduler.poll_once().unwrap();

    assert_eq!(scheduler.source_system(), "shift-notes");
    assert_eq!(repo.runs()[0].source_system, "shift-notes");
}

#[test]
fn retry_recovers_healed_enhancements() {
    let adapter = Arc::new(ScriptedAdapter::new(
        "test",
        vec![ScriptStep::Entries(vec![
            entry("e1", "one"),
            entry("e2", "two"),
            entry("e3", "three"),
        ])],
    ));
    let repo = Arc::new(InMemoryRepository::new());
    let enhancer = Arc::new(RecordingEnhancer::failing_for("summarize", &["e1", "e3"]));
    let scheduler = scheduler(fast_config(), &adapter, &repo).with_enhancer(enhancer.clone());
    scheduler.poll_once().unwrap();

    let still_broken = scheduler.retry_failed_enhancements(10).unwrap();
    assert_eq!(still_broken.attempted, 2);
    assert_eq!(still_broken.still_failing, 2);
    assert_eq!(repo.enhancement("e1", "summarize").unwrap().attempts, 2);

    enhancer.heal();
    let healed = scheduler.retry_failed_enhancements(10).unwrap();
    assert_eq!(healed.attempted, 2);
    assert_eq!(healed.recovered, 2);
    assert_eq!(
        repo.enhancement("e3", "summarize").unwrap().state,
        EnhancementState::Complete
    );
    assert_eq!(scheduler.retry_failed_enhancements(10).unwrap().attempted, 0);
}

#[test]
fn sqlite_backed_cycle_persists_entries_runs_and_enhancements() {
    let db = Arc::new(DatabaseManager::open_in_memory().unwrap());
    let repo = Arc::new(SqliteRepository::new(db));
    let adapter = Arc::new(ScriptedAdapter::new(
        "test",
        vec![
            ScriptStep::Entries(vec![
                entry("e1", "boiler pressure high"),
                entry("e2", "valve replaced"),
            ]),
            ScriptStep::Entries(vec![entry("e2", "valve replaced")]),
        ],
    ));
    let enhancer: Arc<dyn Enhancer> =
        Arc::new(RecordingEnhancer::failing_for("summarize", &["e1"]));
    let scheduler = IngestionScheduler::new(fast_config(), adapter.clone(), repo.clone())
        .unwrap()
        .with_enhancer(enhancer);

    let first = scheduler.poll_once().unwrap();
    assert_eq!(first.entries_added, 2);
    let second = scheduler.poll_once().unwrap();
    assert_eq!(second.entries_unchanged, 1);
    assert_eq!(adapter.windows()[0].0, None);
    assert!(adapter.windows()[1].0.is_some());

    assert_eq!(repo.count_entries().unwrap(), 2);
    let runs = repo.recent_runs(Some("test"), 10).unwrap();
    assert_eq!(runs.len(), 2);
    assert!(runs.iter().all(|r| r.status == RunStatus::Completed));

    let e1 = repo.enhancement_status("e1").unwrap();
    assert_eq!(e1.len(), 1);
    assert_eq!(e1[0].state, EnhancementState::Failed);
    assert_eq!(e1[0].attempts, 1);

    // Unchanged entries still go through every enhancer.
    let e2 = repo.enhancement_status("e2").unwrap();
    assert_eq!(e2[0].state, EnhancementState::Complete);
    assert_eq!(e2[0].attempts, 2);
}
