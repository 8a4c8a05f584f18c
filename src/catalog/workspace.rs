//! Workspace steps: clone the source repositories, then one aggregate build
//!
//! Each repository gets its own clone step so a half-provisioned machine
//! resumes exactly where it stopped. The build is a single colcon
//! invocation over the whole workspace: the packages are interdependent
//! (px4_ros_com compiles against px4_msgs), so they build together or not
//! at all.

use crate::core::{Action, EnvContext, Probe, ProvisionConfig, Step};
use crate::runner::CommandSpec;

/// Clone steps for every configured repository, then the build step
pub fn steps(ctx: &EnvContext, config: &ProvisionConfig) -> Vec<Step> {
    let mut steps: Vec<Step> = config
        .workspace_repos
        .iter()
        .map(|repo| clone_repo(ctx, &repo.url, &repo.dest))
        .collect();
    steps.push(build(ctx));
    steps
}

fn clone_repo(ctx: &EnvContext, url: &str, dest: &str) -> Step {
    let target = ctx.workspace_src().join(dest);

    Step::new(
        format!("workspace-{}", dest.replace('_', "-")),
        format!("clone {} into the workspace", dest),
        Probe::DirExists(target.clone()),
        Action::Commands(vec![
            CommandSpec::new("mkdir")
                .arg("-p")
                .arg(ctx.workspace_src().display().to_string()),
            CommandSpec::new("git")
                .arg("clone")
                .arg(url)
                .arg(target.display().to_string()),
        ]),
    )
}

/// One aggregate colcon build over the workspace root, with the ROS
/// environment sourced. Runs only after every clone step has resolved -
/// the ordering is enforced by step order, nothing else.
fn build(ctx: &EnvContext) -> Step {
    Step::new(
        "workspace-build",
        "build the workspace with colcon",
        Probe::DirExists(ctx.workspace_root.join("install")),
        Action::Commands(vec![CommandSpec::shell(format!(
            ". {}/setup.sh && colcon build",
            ctx.ros_root().display()
        ))
        .current_dir(ctx.workspace_root.clone())]),
    )
}
