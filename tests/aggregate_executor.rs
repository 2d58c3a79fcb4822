use tokio_util::sync::CancellationToken;

use jobrunner::engine::{AggregateOutcome, run_aggregate_batch};
use jobrunner::errors::JobFailure;
use jobrunner::jobs::JobId;
use jobrunner_test_utils::builders::{aggregate_job, ids};
use jobrunner_test_utils::fake_runner::{FakeOutcome, FakeRunner};
use jobrunner_test_utils::init_tracing;

#[tokio::test]
async fn job_without_dependencies_always_runs() {
    init_tracing();

    let runner = FakeRunner::new();
    let report = run_aggregate_batch(&[aggregate_job("a1", &[])], &ids(&[]), &runner, &CancellationToken::new()).await;

    assert_eq!(report.ran().count(), 1);
    assert_eq!(report.skipped().count(), 0);
    assert!(runner.was_started("a1"));
}

#[tokio::test]
async fn job_runs_when_all_dependencies_completed() {
    init_tracing();

    let runner = FakeRunner::new();
    let report = run_aggregate_batch(
        &[aggregate_job("a1", &["p1", "p2"])],
        &ids(&["p1", "p2"]),
        &runner,
        &CancellationToken::new(),
    )
    .await;

    let ran: Vec<&str> = report.ran().map(|r| r.job_id.as_str()).collect();
    assert_eq!(ran, vec!["a1"]);
    assert_eq!(report.outcomes[0].job_id(), &JobId::from("a1"));
}

#[tokio::test]
async fn unknown_dependency_is_reported_as_skip() {
    init_tracing();

    let runner = FakeRunner::new();
    let report = run_aggregate_batch(
        &[aggregate_job("a1", &["p1", "P2"])],
        &ids(&["p1"]),
        &runner,
        &CancellationToken::new(),
    )
    .await;

    assert!(!runner.was_started("a1"));
    assert_eq!(
        report.outcomes,
        vec![AggregateOutcome::Skipped(JobFailure::UnresolvedDependency {
            job_id: JobId::from("a1"),
            missing: vec![JobId::from("P2")],
        })]
    );
}

#[tokio::test]
async fn unmet_dependencies_are_listed_in_declared_order() {
    init_tracing();

    let runner = FakeRunner::new();
    let report = run_aggregate_batch(
        &[aggregate_job("a1", &["z", "p1", "b"])],
        &ids(&["p1"]),
        &runner,
        &CancellationToken::new(),
    )
    .await;

    match report.skipped().next() {
        Some(JobFailure::UnresolvedDependency { missing, .. }) => {
            assert_eq!(missing, &vec![JobId::from("z"), JobId::from("b")]);
        }
        other => panic!("expected a skip, got {other:?}"),
    }
}

#[tokio::test]
async fn failing_aggregate_does_not_stop_later_ones() {
    init_tracing();

    let runner = FakeRunner::new().with("a1", FakeOutcome::fail());
    let jobs = [
        aggregate_job("a1", &["p1"]),
        aggregate_job("a2", &["missing"]),
        aggregate_job("a3", &["p1"]),
    ];

    let report = run_aggregate_batch(&jobs, &ids(&["p1"]), &runner, &CancellationToken::new()).await;

    let order: Vec<&str> = report.outcomes.iter().map(|o| o.job_id().as_str()).collect();
    assert_eq!(order, vec!["a1", "a2", "a3"]);

    let failed: Vec<&str> = report.failed().map(|r| r.job_id.as_str()).collect();
    assert_eq!(failed, vec!["a1"]);
    assert_eq!(report.skipped().count(), 1);

    let started: Vec<JobId> = runner.started();
    assert_eq!(started, vec![JobId::from("a1"), JobId::from("a3")]);
    assert_eq!(runner.peak_concurrency(), 1);
}

#[tokio::test]
async fn cancelled_shutdown_leaves_remaining_jobs_not_started() {
    init_tracing();

    let runner = FakeRunner::new();
    let shutdown = CancellationToken::new();
    shutdown.cancel();

    let jobs = [aggregate_job("a1", &[]), aggregate_job("a2", &[])];
    let report = run_aggregate_batch(&jobs, &ids(&[]), &runner, &shutdown).await;

    assert!(runner.started().is_empty());
    assert_eq!(
        report.outcomes,
        vec![
            AggregateOutcome::NotStarted(JobId::from("a1")),
            AggregateOutcome::NotStarted(JobId::from("a2")),
        ]
    );
}
