use std::error::Error;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use jobrunner::engine::run_prediction_batch;
use jobrunner::errors::{JobFailure, JobrunnerError};
use jobrunner::jobs::JobId;
use jobrunner_test_utils::builders::{ids, prediction_jobs};
use jobrunner_test_utils::fake_runner::{FakeOutcome, FakeRunner};
use jobrunner_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn empty_batch_returns_empty_sets() -> TestResult {
    init_tracing();

    let runner = Arc::new(FakeRunner::new());
    let report =
        run_prediction_batch(Vec::new(), 4, runner.clone(), CancellationToken::new()).await?;

    assert!(report.completed.is_empty());
    assert!(report.failed.is_empty());
    assert!(report.not_started.is_empty());
    assert!(runner.started().is_empty());
    Ok(())
}

#[tokio::test]
async fn zero_worker_limit_is_rejected_before_dispatch() {
    init_tracing();

    let runner = Arc::new(FakeRunner::new());
    let err = run_prediction_batch(
        prediction_jobs(&["p1", "p2"]),
        0,
        runner.clone(),
        CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, JobrunnerError::InvalidWorkerLimit(0)));
    assert!(runner.started().is_empty());
}

#[tokio::test]
async fn all_successful_jobs_are_completed() -> TestResult {
    init_tracing();

    let runner = Arc::new(FakeRunner::new());
    let report = with_timeout(run_prediction_batch(
        prediction_jobs(&["p1", "p2", "p3", "p4", "p5"]),
        3,
        runner.clone(),
        CancellationToken::new(),
    ))
    .await?;

    assert_eq!(report.completed, ids(&["p1", "p2", "p3", "p4", "p5"]));
    assert!(report.failed.is_empty());
    assert!(report.all_succeeded());
    assert_eq!(runner.started().len(), 5);
    Ok(())
}

#[tokio::test]
async fn peak_concurrency_never_exceeds_worker_limit() -> TestResult {
    init_tracing();

    let mut runner = FakeRunner::new();
    for id in ["p1", "p2", "p3", "p4", "p5", "p6", "p7", "p8"] {
        runner = runner.with(id, FakeOutcome::ok().after_ms(20));
    }
    let runner = Arc::new(runner);

    let report = with_timeout(run_prediction_batch(
        prediction_jobs(&["p1", "p2", "p3", "p4", "p5", "p6", "p7", "p8"]),
        3,
        runner.clone(),
        CancellationToken::new(),
    ))
    .await?;

    assert_eq!(report.completed.len(), 8);
    assert!(runner.peak_concurrency() <= 3);
    assert!(runner.peak_concurrency() >= 2, "jobs should overlap");
    Ok(())
}

#[tokio::test]
async fn single_worker_runs_jobs_in_submission_order() -> TestResult {
    init_tracing();

    let runner = Arc::new(FakeRunner::new());
    let report = with_timeout(run_prediction_batch(
        prediction_jobs(&["p1", "p2", "p3"]),
        1,
        runner.clone(),
        CancellationToken::new(),
    ))
    .await?;

    let expected: Vec<JobId> = ["p1", "p2", "p3"].into_iter().map(JobId::from).collect();
    assert_eq!(runner.started(), expected);
    assert_eq!(runner.peak_concurrency(), 1);
    assert_eq!(report.completed, ids(&["p1", "p2", "p3"]));
    Ok(())
}

#[tokio::test]
async fn single_worker_stops_right_after_first_failure() -> TestResult {
    init_tracing();

    let runner = Arc::new(FakeRunner::new().with("p2", FakeOutcome::fail()));
    let report = with_timeout(run_prediction_batch(
        prediction_jobs(&["p1", "p2", "p3"]),
        1,
        runner.clone(),
        CancellationToken::new(),
    ))
    .await?;

    assert_eq!(report.completed, ids(&["p1"]));
    assert_eq!(report.failed, ids(&["p2"]));
    assert_eq!(report.not_started, vec![JobId::from("p3")]);
    assert!(!runner.was_started("p3"));
    assert!(!report.all_succeeded());

    assert_eq!(
        report.failures,
        vec![JobFailure::JobExecutionFailure {
            job_id: JobId::from("p2"),
            exit_code: Some(1),
            output: "p2 failed".to_string(),
        }]
    );
    Ok(())
}

#[tokio::test]
async fn failure_with_two_workers_stops_admission() -> TestResult {
    init_tracing();

    // p1 is still running when p2 fails; p3 is never picked up.
    let runner = Arc::new(
        FakeRunner::new()
            .with("p1", FakeOutcome::ok().after_ms(100))
            .with("p2", FakeOutcome::fail().after_ms(10)),
    );

    let report = with_timeout(run_prediction_batch(
        prediction_jobs(&["p1", "p2", "p3"]),
        2,
        runner.clone(),
        CancellationToken::new(),
    ))
    .await?;

    assert_eq!(report.failed, ids(&["p2"]));
    assert!(report.completed.is_subset(&ids(&["p1", "p3"])));
    assert!(report.completed.is_disjoint(&report.failed));

    // In-flight p1 was awaited and recorded.
    assert!(report.completed.contains(&JobId::from("p1")));
    assert!(!runner.was_started("p3"));
    assert_eq!(report.not_started, vec![JobId::from("p3")]);
    Ok(())
}

#[tokio::test]
async fn in_flight_failures_are_all_recorded() -> TestResult {
    init_tracing();

    let runner = Arc::new(
        FakeRunner::new()
            .with("p1", FakeOutcome::fail().after_ms(10))
            .with("p2", FakeOutcome::fail().after_ms(50)),
    );

    let report = with_timeout(run_prediction_batch(
        prediction_jobs(&["p1", "p2", "p3", "p4"]),
        2,
        runner.clone(),
        CancellationToken::new(),
    ))
    .await?;

    assert_eq!(report.failed, ids(&["p1", "p2"]));
    assert!(report.completed.is_empty());
    assert_eq!(report.failures.len(), 2);
    assert_eq!(
        report.not_started,
        vec![JobId::from("p3"), JobId::from("p4")]
    );
    Ok(())
}

#[tokio::test]
async fn cancelled_shutdown_token_starts_nothing() -> TestResult {
    init_tracing();

    let shutdown = CancellationToken::new();
    shutdown.cancel();

    let runner = Arc::new(FakeRunner::new());
    let report = with_timeout(run_prediction_batch(
        prediction_jobs(&["p1", "p2"]),
        2,
        runner.clone(),
        shutdown,
    ))
    .await?;

    assert!(runner.started().is_empty());
    assert!(report.failed.is_empty());
    assert_eq!(report.not_started.len(), 2);
    assert!(!report.all_succeeded());
    Ok(())
}

#[tokio::test]
async fn worker_limit_larger_than_batch_is_fine() -> TestResult {
    init_tracing();

    let runner = Arc::new(FakeRunner::new());
    let report = with_timeout(run_prediction_batch(
        prediction_jobs(&["p1", "p2"]),
        64,
        runner.clone(),
        CancellationToken::new(),
    ))
    .await?;

    assert_eq!(report.completed, ids(&["p1", "p2"]));
    assert!(runner.peak_concurrency() <= 2);
    Ok(())
}

#[tokio::test]
async fn panicking_runner_counts_as_failed_and_stops_admission() -> TestResult {
    init_tracing();

    let runner = Arc::new(FakeRunner::new().with("p2", FakeOutcome::panic()));
    let report = with_timeout(run_prediction_batch(
        prediction_jobs(&["p1", "p2", "p3"]),
        1,
        runner.clone(),
        CancellationToken::new(),
    ))
    .await?;

    assert_eq!(report.completed, ids(&["p1"]));
    assert_eq!(report.failed, ids(&["p2"]));
    assert_eq!(report.not_started, vec![JobId::from("p3")]);
    assert!(!runner.was_started("p3"));

    match report.failures.as_slice() {
        [JobFailure::JobExecutionFailure {
            job_id,
            exit_code,
            output,
        }] => {
            assert_eq!(job_id.as_str(), "p2");
            assert_eq!(*exit_code, None);
            assert!(output.contains("panicked"), "output: {output}");
        }
        other => panic!("unexpected failures: {other:?}"),
    }
    Ok(())
}
