//! Environment context - the machine facts every step is parameterized with
//!
//! Steps never read ambient process state; everything they need (paths,
//! codename, architecture, target user) is resolved once up front and
//! threaded through the step catalog. This keeps the ordering dependencies
//! between steps visible and makes the catalog testable against a scratch
//! directory.

use crate::core::config::ProvisionConfig;
use crate::runner::{CommandRunner, CommandSpec};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Resolved machine context for one provisioning run
#[derive(Debug, Clone)]
pub struct EnvContext {
    /// Target user, used for group membership and the workspace path
    pub user: String,

    /// Target user's home directory
    pub home: PathBuf,

    /// Root under which /etc and /opt paths are anchored. "/" on a real
    /// machine; tests point it at a scratch directory.
    pub system_root: PathBuf,

    /// Distribution codename (e.g. "jammy"), selects apt repository URLs
    pub codename: String,

    /// dpkg architecture (e.g. "amd64") for apt source entries
    pub arch: String,

    /// ROS distribution name (e.g. "humble")
    pub ros_distro: String,

    /// Canonical colcon workspace root
    pub workspace_root: PathBuf,
}

impl EnvContext {
    /// Detect the context from the running machine
    ///
    /// Detection never aborts the run: anything it cannot determine falls
    /// back to the Ubuntu 22.04 defaults with a warning. The interpreter
    /// gate, not detection, decides whether the machine is usable.
    pub async fn detect<R: CommandRunner + ?Sized>(runner: &R, config: &ProvisionConfig) -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| {
            warn!("could not determine a home directory, assuming /root");
            PathBuf::from("/root")
        });

        let user = std::env::var("USER").unwrap_or_else(|_| {
            warn!("USER is not set, assuming root");
            "root".to_string()
        });

        let codename = codename_from_os_release(Path::new("/etc/os-release")).unwrap_or_else(|| {
            warn!("could not read a codename from /etc/os-release, assuming jammy");
            "jammy".to_string()
        });

        let arch_spec = CommandSpec::new("dpkg").arg("--print-architecture");
        let arch = match runner.capture(&arch_spec).await {
            Ok(output) if output.success => output.stdout.trim().to_string(),
            _ => {
                warn!("could not detect the dpkg architecture, assuming amd64");
                "amd64".to_string()
            }
        };

        let workspace_root = config
            .workspace
            .clone()
            .unwrap_or_else(|| home.join("ros2_px4_ws"));

        Self {
            user,
            home,
            system_root: PathBuf::from("/"),
            codename,
            arch,
            ros_distro: config.ros_distro.clone(),
            workspace_root,
        }
    }

    /// ROS installation root, e.g. /opt/ros/humble
    pub fn ros_root(&self) -> PathBuf {
        self.system_root.join("opt/ros").join(&self.ros_distro)
    }

    /// The line steps append to the shell profile so new shells see ROS
    pub fn ros_source_line(&self) -> String {
        format!("source {}/setup.bash", self.ros_root().display())
    }

    /// Shell profile the sourcing line is persisted to
    pub fn profile_path(&self) -> PathBuf {
        self.home.join(".bashrc")
    }

    /// Directory apt source entries are written into
    pub fn apt_sources_dir(&self) -> PathBuf {
        self.system_root.join("etc/apt/sources.list.d")
    }

    /// PX4 Autopilot checkout
    pub fn px4_root(&self) -> PathBuf {
        self.home.join("PX4-Autopilot")
    }

    /// Micro XRCE-DDS Agent checkout and build directory
    pub fn agent_root(&self) -> PathBuf {
        self.home.join("Micro-XRCE-DDS-Agent")
    }

    /// Downloaded QGroundControl AppImage
    pub fn qgc_path(&self) -> PathBuf {
        self.home.join("QGroundControl.AppImage")
    }

    /// Source directory inside the colcon workspace
    pub fn workspace_src(&self) -> PathBuf {
        self.workspace_root.join("src")
    }

    /// Environment variables exported to package-manager commands
    pub fn apt_env(&self) -> Vec<(String, String)> {
        vec![("DEBIAN_FRONTEND".to_string(), "noninteractive".to_string())]
    }
}

/// Parse VERSION_CODENAME (or UBUNTU_CODENAME) out of an os-release file
fn codename_from_os_release(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let mut ubuntu_codename = None;

    for line in content.lines() {
        if let Some(value) = line.strip_prefix("VERSION_CODENAME=") {
            return Some(value.trim_matches('"').to_string());
        }
        if let Some(value) = line.strip_prefix("UBUNTU_CODENAME=") {
            ubuntu_codename = Some(value.trim_matches('"').to_string());
        }
    }

    ubuntu_codename
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_context(root: &Path) -> EnvContext {
        EnvContext {
            user: "pilot".to_string(),
            home: root.join("home/pilot"),
            system_root: root.to_path_buf(),
            codename: "jammy".to_string(),
            arch: "amd64".to_string(),
            ros_distro: "humble".to_string(),
            workspace_root: root.join("home/pilot/ros2_px4_ws"),
        }
    }

    #[test]
    fn test_derived_paths() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        assert_eq!(ctx.ros_root(), dir.path().join("opt/ros/humble"));
        assert_eq!(
            ctx.apt_sources_dir(),
            dir.path().join("etc/apt/sources.list.d")
        );
        assert_eq!(ctx.profile_path(), dir.path().join("home/pilot/.bashrc"));
        assert_eq!(ctx.workspace_src(), ctx.workspace_root.join("src"));
    }

    #[test]
    fn test_ros_source_line_tracks_distro() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = test_context(dir.path());
        ctx.ros_distro = "iron".to_string();

        let line = ctx.ros_source_line();
        assert!(line.starts_with("source "));
        assert!(line.contains("opt/ros/iron/setup.bash"));
    }

    #[test]
    fn test_codename_from_os_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("os-release");

        std::fs::write(
            &path,
            "NAME=\"Ubuntu\"\nVERSION_CODENAME=jammy\nUBUNTU_CODENAME=jammy\n",
        )
        .unwrap();
        assert_eq!(codename_from_os_release(&path), Some("jammy".to_string()));

        std::fs::write(&path, "NAME=\"Ubuntu\"\nUBUNTU_CODENAME=focal\n").unwrap();
        assert_eq!(codename_from_os_release(&path), Some("focal".to_string()));

        std::fs::write(&path, "NAME=Debian\n").unwrap();
        assert_eq!(codename_from_os_release(&path), None);

        assert_eq!(codename_from_os_release(&dir.path().join("missing")), None);
    }
}
