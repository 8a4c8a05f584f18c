//! Shell-profile guard scenario: running the sourcing step twice leaves
//! exactly one occurrence of the line.

mod common;

use airstrap::catalog::ros2;
use airstrap::core::{Plan, StepOutcome};
use airstrap::execution::Driver;
use common::{test_context, MockRunner};

fn profile_plan(ctx: &airstrap::core::EnvContext) -> Plan {
    let step = ros2::steps(ctx)
        .into_iter()
        .find(|s| s.id == "ros2-profile-line")
        .expect("the catalog defines the profile step");
    Plan::new("profile-only", vec![step])
}

#[tokio::test]
async fn appending_twice_keeps_one_occurrence() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_context(dir.path());
    let line = ctx.ros_source_line();

    let first = Driver::new(MockRunner::new())
        .run(&profile_plan(&ctx))
        .await;
    assert!(first.succeeded());
    assert_eq!(first.records[0].outcome, StepOutcome::Succeeded);

    let content = std::fs::read_to_string(ctx.profile_path()).unwrap();
    assert_eq!(content.matches(&line).count(), 1);

    // Second run: the probe sees the line and the step is skipped
    let second = Driver::new(MockRunner::new())
        .run(&profile_plan(&ctx))
        .await;
    assert!(second.succeeded());
    assert_eq!(second.records[0].outcome, StepOutcome::Skipped);

    let content = std::fs::read_to_string(ctx.profile_path()).unwrap();
    assert_eq!(content.matches(&line).count(), 1);
}

#[tokio::test]
async fn existing_profile_content_survives() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_context(dir.path());

    std::fs::write(ctx.profile_path(), "export EDITOR=vim\n").unwrap();

    let report = Driver::new(MockRunner::new())
        .run(&profile_plan(&ctx))
        .await;
    assert!(report.succeeded());

    let content = std::fs::read_to_string(ctx.profile_path()).unwrap();
    assert!(content.starts_with("export EDITOR=vim\n"));
    assert!(content.contains(&ctx.ros_source_line()));
}
