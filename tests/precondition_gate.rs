//! Interpreter gate scenario: a wrong or missing python3 fails the run
//! before any installer step is invoked.

mod common;

use airstrap::catalog;
use airstrap::core::{ProvisionConfig, ProvisionError, RunState};
use airstrap::execution::Driver;
use common::{test_context, MockRunner};

#[tokio::test]
async fn wrong_interpreter_series_blocks_every_installer() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_context(dir.path());
    let config = ProvisionConfig::default();
    let plan = catalog::provisioning_plan(&ctx, &config);

    let runner = MockRunner::new();
    runner.set_python("3.9.7");

    let handle = runner.clone();
    let report = Driver::new(runner).run(&plan).await;

    assert!(matches!(report.state, RunState::Failed { step: 0, .. }));
    assert!(report.records.is_empty());
    assert!(handle.runs().is_empty());

    match report.failure() {
        Some(ProvisionError::Precondition(reason)) => {
            assert!(reason.contains("3.10"));
            assert!(reason.contains("3.9.7"));
        }
        other => panic!("expected a precondition failure, got {:?}", other),
    }
}

#[tokio::test]
async fn missing_interpreter_blocks_every_installer() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_context(dir.path());
    let config = ProvisionConfig::default();
    let plan = catalog::provisioning_plan(&ctx, &config);

    let runner = MockRunner::new();
    runner.remove_python();

    let handle = runner.clone();
    let report = Driver::new(runner).run(&plan).await;

    assert!(matches!(report.state, RunState::Failed { .. }));
    assert!(handle.runs().is_empty());

    match report.failure() {
        Some(ProvisionError::Precondition(reason)) => {
            assert!(reason.contains("not found"));
        }
        other => panic!("expected a precondition failure, got {:?}", other),
    }
}

#[tokio::test]
async fn matching_interpreter_passes_the_gate() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_context(dir.path());
    let config = ProvisionConfig::default();
    let plan = catalog::provisioning_plan(&ctx, &config);

    // MockRunner reports Python 3.10.12 by default
    let report = Driver::new(MockRunner::new()).run(&plan).await;
    assert_eq!(report.state, RunState::Succeeded);
}
