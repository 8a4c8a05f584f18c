//! Flight-simulation steps: Gazebo, the PX4 Autopilot tree, QGroundControl

use crate::core::{Action, EnvContext, Probe, ProvisionConfig, Step};
use crate::runner::CommandSpec;

const OSRF_KEY_URL: &str = "https://packages.osrfoundation.org/gazebo.gpg";
const OSRF_KEYRING: &str = "/usr/share/keyrings/pkgs-osrf-archive-keyring.gpg";
const GAZEBO_PACKAGE: &str = "gz-garden";

/// Install Gazebo from the OSRF package repository
pub fn gazebo(ctx: &EnvContext) -> Step {
    let sources_list = ctx.apt_sources_dir().join("gazebo-stable.list");

    let entry = format!(
        "deb [arch={arch} signed-by={keyring}] http://packages.osrfoundation.org/gazebo/ubuntu-stable {codename} main",
        arch = ctx.arch,
        keyring = OSRF_KEYRING,
        codename = ctx.codename,
    );

    Step::new(
        "gazebo",
        "install the Gazebo simulator",
        Probe::PkgInstalled(GAZEBO_PACKAGE.to_string()),
        Action::Commands(vec![
            CommandSpec::shell(format!("sudo curl -sSL {} -o {}", OSRF_KEY_URL, OSRF_KEYRING)),
            CommandSpec::shell(format!(
                "echo \"{}\" | sudo tee {} >/dev/null",
                entry,
                sources_list.display()
            )),
            CommandSpec::shell("sudo apt-get update".to_string())
                .env("DEBIAN_FRONTEND", "noninteractive"),
            CommandSpec::shell(format!("sudo apt-get install -y {}", GAZEBO_PACKAGE))
                .env("DEBIAN_FRONTEND", "noninteractive"),
        ]),
    )
}

/// Clone the PX4 Autopilot tree, install its toolchain, build SITL
pub fn px4_autopilot(ctx: &EnvContext, config: &ProvisionConfig) -> Step {
    let dest = ctx.px4_root();

    Step::new(
        "px4-autopilot",
        "clone and build the PX4 Autopilot SITL target",
        Probe::DirExists(dest.clone()),
        Action::Commands(vec![
            CommandSpec::new("git")
                .args(["clone", "--recursive"])
                .arg(config.px4_remote.clone())
                .arg(dest.display().to_string()),
            CommandSpec::new("bash")
                .arg(dest.join("Tools/setup/ubuntu.sh").display().to_string()),
            CommandSpec::new("make")
                .arg("px4_sitl")
                .current_dir(dest),
        ]),
    )
}

/// Download QGroundControl and prepare the host for it
pub fn qgroundcontrol(ctx: &EnvContext, config: &ProvisionConfig) -> Step {
    let appimage = ctx.qgc_path();

    Step::new(
        "qgroundcontrol",
        "download the QGroundControl ground station",
        Probe::FileExists(appimage.clone()),
        Action::Commands(vec![
            CommandSpec::shell(format!("sudo usermod -a -G dialout {}", ctx.user)),
            CommandSpec::shell("sudo apt-get remove -y modemmanager".to_string())
                .env("DEBIAN_FRONTEND", "noninteractive"),
            CommandSpec::shell(
                "sudo apt-get install -y gstreamer1.0-plugins-bad gstreamer1.0-libav \
                 gstreamer1.0-gl libfuse2"
                    .to_string(),
            )
            .env("DEBIAN_FRONTEND", "noninteractive"),
            CommandSpec::shell(format!(
                "curl -sSL -o {} {}",
                appimage.display(),
                config.qgc_url
            )),
            CommandSpec::shell(format!("chmod +x {}", appimage.display())),
        ]),
    )
}
