//! ROS 2 middleware steps: apt repository, desktop install, shell profile

use crate::core::{Action, EnvContext, Probe, Step};
use crate::runner::CommandSpec;

const ROS_KEY_URL: &str = "https://raw.githubusercontent.com/ros/rosdistro/master/ros.key";
const ROS_KEYRING: &str = "/usr/share/keyrings/ros-archive-keyring.gpg";

fn apt_shell(ctx: &EnvContext, script: String) -> CommandSpec {
    let mut spec = CommandSpec::shell(script);
    for (key, value) in ctx.apt_env() {
        spec = spec.env(key, value);
    }
    spec
}

/// The three ROS 2 steps, in order
pub fn steps(ctx: &EnvContext) -> Vec<Step> {
    vec![apt_source(ctx), desktop(ctx), profile_line(ctx)]
}

/// Register the packages.ros.org apt repository
fn apt_source(ctx: &EnvContext) -> Step {
    let sources_list = ctx.apt_sources_dir().join("ros2.list");

    let entry = format!(
        "deb [arch={arch} signed-by={keyring}] http://packages.ros.org/ros2/ubuntu {codename} main",
        arch = ctx.arch,
        keyring = ROS_KEYRING,
        codename = ctx.codename,
    );

    Step::new(
        "ros2-apt-source",
        "register the ROS 2 apt repository",
        Probe::FileExists(sources_list.clone()),
        Action::Commands(vec![
            apt_shell(ctx, "sudo apt-get update".to_string()),
            apt_shell(
                ctx,
                "sudo apt-get install -y software-properties-common curl".to_string(),
            ),
            apt_shell(ctx, "sudo add-apt-repository -y universe".to_string()),
            CommandSpec::shell(format!(
                "sudo curl -sSL {} -o {}",
                ROS_KEY_URL, ROS_KEYRING
            )),
            CommandSpec::shell(format!(
                "echo \"{}\" | sudo tee {} >/dev/null",
                entry,
                sources_list.display()
            )),
            apt_shell(ctx, "sudo apt-get update".to_string()),
        ]),
    )
}

/// Install the ROS 2 desktop packages and the dev tooling (colcon, rosdep)
fn desktop(ctx: &EnvContext) -> Step {
    Step::new(
        "ros2-desktop",
        format!("install ROS 2 {} desktop and dev tools", ctx.ros_distro),
        Probe::DirExists(ctx.ros_root()),
        Action::Commands(vec![apt_shell(
            ctx,
            format!(
                "sudo apt-get install -y ros-{distro}-desktop ros-dev-tools",
                distro = ctx.ros_distro
            ),
        )]),
    )
}

/// Persist the ROS environment into new shells
fn profile_line(ctx: &EnvContext) -> Step {
    let line = ctx.ros_source_line();

    Step::new(
        "ros2-profile-line",
        format!("source ROS 2 from {}", ctx.profile_path().display()),
        Probe::FileContainsLine {
            path: ctx.profile_path(),
            line: line.clone(),
        },
        Action::AppendLine {
            path: ctx.profile_path(),
            line,
        },
    )
}
