//! Provisioner configuration from YAML
//!
//! Every field has a default, so the tool runs with no configuration file
//! at all. A file only needs the keys it overrides.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration loaded from airstrap.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionConfig {
    /// ROS distribution to install
    #[serde(default = "defaults::ros_distro")]
    pub ros_distro: String,

    /// Colcon workspace root (defaults to ~/ros2_px4_ws)
    #[serde(default)]
    pub workspace: Option<PathBuf>,

    /// PX4 Autopilot git remote
    #[serde(default = "defaults::px4_remote")]
    pub px4_remote: String,

    /// Micro XRCE-DDS Agent git remote
    #[serde(default = "defaults::agent_remote")]
    pub agent_remote: String,

    /// QGroundControl AppImage download URL
    #[serde(default = "defaults::qgc_url")]
    pub qgc_url: String,

    /// Source repositories cloned into the workspace and built together
    #[serde(default = "defaults::workspace_repos")]
    pub workspace_repos: Vec<RepoSpec>,
}

/// One workspace source repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSpec {
    /// Clone URL
    pub url: String,

    /// Destination subdirectory under the workspace src/ directory
    pub dest: String,
}

mod defaults {
    use super::RepoSpec;

    pub fn ros_distro() -> String {
        "humble".to_string()
    }

    pub fn px4_remote() -> String {
        "https://github.com/PX4/PX4-Autopilot.git".to_string()
    }

    pub fn agent_remote() -> String {
        "https://github.com/eProsima/Micro-XRCE-DDS-Agent.git".to_string()
    }

    pub fn qgc_url() -> String {
        "https://d176tv9ibo4jno.cloudfront.net/latest/QGroundControl.AppImage".to_string()
    }

    pub fn workspace_repos() -> Vec<RepoSpec> {
        vec![
            RepoSpec {
                url: "https://github.com/PX4/px4_msgs.git".to_string(),
                dest: "px4_msgs".to_string(),
            },
            RepoSpec {
                url: "https://github.com/PX4/px4_ros_com.git".to_string(),
                dest: "px4_ros_com".to_string(),
            },
        ]
    }
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            ros_distro: defaults::ros_distro(),
            workspace: None,
            px4_remote: defaults::px4_remote(),
            agent_remote: defaults::agent_remote(),
            qgc_url: defaults::qgc_url(),
            workspace_repos: defaults::workspace_repos(),
        }
    }
}

impl ProvisionConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ProvisionConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the effective configuration: an explicit path must exist,
    /// otherwise ./airstrap.yaml is picked up if present, otherwise the
    /// built-in defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new("airstrap.yaml");
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.ros_distro.trim().is_empty() {
            anyhow::bail!("ros_distro must not be empty");
        }

        if self.workspace_repos.is_empty() {
            anyhow::bail!("workspace_repos must list at least one repository");
        }

        let mut seen = std::collections::HashSet::new();
        for repo in &self.workspace_repos {
            if repo.url.trim().is_empty() {
                anyhow::bail!("workspace repository `{}` has an empty url", repo.dest);
            }
            if repo.dest.trim().is_empty() || repo.dest.contains('/') {
                anyhow::bail!(
                    "workspace repository destination `{}` must be a bare directory name",
                    repo.dest
                );
            }
            if !seen.insert(&repo.dest) {
                anyhow::bail!("duplicate workspace repository destination: {}", repo.dest);
            }
        }

        Ok(())
    }
}
