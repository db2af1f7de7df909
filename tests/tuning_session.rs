//! Last-write-wins behaviour of the tuning session under a burst of submissions.

mod common;

use enhance_filters::{FilterParameters, Pipeline, PipelineError};
use image_enhance::Recoverable;
use image_enhance::error::{RecoveryStrategy, classify};
use image_enhance::session::TuningSession;

fn slider_positions() -> Vec<FilterParameters> {
    (0..6)
        .map(|i| FilterParameters::new(2.0, 0.1 * i as f32, 0.4, 1.0 + i as f32 * 0.5, 0.8))
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn only_the_newest_submission_wins() {
    let session = TuningSession::new(common::speckled(16, 16), Pipeline::new());
    let params = slider_positions();

    let pending: Vec<_> = params.iter().map(|p| session.submit(*p)).collect();
    assert_eq!(session.current_generation(), params.len() as u64);

    let mut accepted = Vec::new();
    for run in pending {
        match run.wait().await {
            Ok(result) => accepted.push(result),
            Err(err) => {
                assert!(classify::is_stale(&err), "unexpected error: {err}");
                assert_eq!(err.recovery_strategies(), vec![RecoveryStrategy::Discard]);
            }
        }
    }

    assert_eq!(accepted.len(), 1);
    let newest = &accepted[0];
    assert_eq!(newest.generation, params.len() as u64);
    assert_eq!(newest.params, params[params.len() - 1]);
    assert_eq!(newest.buffer.dimensions(), (32, 32));

    let latest = session.latest().await.unwrap();
    assert_eq!(latest.generation, newest.generation);
}

#[tokio::test]
async fn a_failed_newest_run_keeps_the_previous_result() {
    let session = TuningSession::new(common::gradient(8, 8), Pipeline::new());

    let good = session
        .submit(FilterParameters::identity(2.0))
        .wait()
        .await
        .unwrap();

    let bad = FilterParameters {
        noise_level: 3.0,
        ..FilterParameters::default()
    };
    let err = session.submit(bad).wait().await.unwrap_err();
    assert!(matches!(
        err.pipeline_error(),
        Some(PipelineError::InvalidParameter {
            name: "noise_level",
            ..
        })
    ));
    assert!(err.is_recoverable());

    let latest = session.latest().await.unwrap();
    assert_eq!(latest.generation, good.generation);
}

#[tokio::test]
async fn sessions_share_state_across_clones() {
    let session = TuningSession::new(common::gradient(4, 4), Pipeline::new());
    let handle = session.clone();

    let stale = session.submit(FilterParameters::identity(2.0));
    let fresh = handle.submit(FilterParameters::identity(1.0));

    assert!(stale.wait().await.is_err());
    let result = fresh.wait().await.unwrap();
    assert_eq!(result.buffer.dimensions(), (4, 4));
    assert_eq!(session.latest().await.unwrap().generation, 2);
}
