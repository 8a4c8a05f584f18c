//! Artifact probes - read-only checks that decide whether a step is needed
//!
//! The filesystem and the dpkg database are the only persisted state this
//! tool has; a probe inspects one of them and nothing else. Probes never
//! mutate anything, so re-running them is always safe.

use crate::runner::{CommandRunner, CommandSpec, RunnerError};
use std::path::PathBuf;
use thiserror::Error;

/// Marker dpkg prints for a fully installed package
const DPKG_INSTALLED: &str = "install ok installed";

/// A read-only check for the artifact a step is responsible for
#[derive(Debug, Clone)]
pub enum Probe {
    /// A directory exists at a fixed path
    DirExists(PathBuf),

    /// A regular file exists at a fixed path
    FileExists(PathBuf),

    /// A file contains the exact line (whitespace-trimmed comparison)
    FileContainsLine { path: PathBuf, line: String },

    /// A command resolves on the lookup path
    CommandOnPath(String),

    /// The dpkg database reports the package as installed
    PkgInstalled(String),
}

/// A probe could not determine the artifact's state. Callers treat this as
/// "not installed" and retry the install rather than failing the run.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Runner(#[from] RunnerError),
}

impl Probe {
    /// Evaluate the probe. `Ok(true)` means the artifact is present and the
    /// owning step can be skipped.
    pub async fn evaluate<R: CommandRunner + ?Sized>(&self, runner: &R) -> Result<bool, ProbeError> {
        match self {
            Probe::DirExists(path) => Ok(path.is_dir()),
            Probe::FileExists(path) => Ok(path.is_file()),
            Probe::FileContainsLine { path, line } => match std::fs::read_to_string(path) {
                Ok(content) => Ok(content.lines().any(|l| l.trim() == line.trim())),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
                Err(source) => Err(ProbeError::Io {
                    path: path.clone(),
                    source,
                }),
            },
            Probe::CommandOnPath(name) => {
                let spec = CommandSpec::shell(format!("command -v {}", name));
                let output = runner.capture(&spec).await?;
                Ok(output.success)
            }
            Probe::PkgInstalled(package) => {
                let spec = CommandSpec::new("dpkg-query")
                    .args(["-W", "-f", "${Status}"])
                    .arg(package);
                let output = runner.capture(&spec).await?;
                Ok(output.success && output.stdout.contains(DPKG_INSTALLED))
            }
        }
    }

    /// Human-readable description of the artifact being checked
    pub fn describe(&self) -> String {
        match self {
            Probe::DirExists(path) => format!("directory {}", path.display()),
            Probe::FileExists(path) => format!("file {}", path.display()),
            Probe::FileContainsLine { path, .. } => format!("line in {}", path.display()),
            Probe::CommandOnPath(name) => format!("`{}` on PATH", name),
            Probe::PkgInstalled(package) => format!("package {} installed", package),
        }
    }
}
