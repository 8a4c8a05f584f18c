//! Interpreter gate - checked before any step mutates the machine
//!
//! Everything downstream (the PX4 setup script, colcon, the ROS tooling)
//! assumes the Ubuntu 22.04 system interpreter, so a wrong python3 fails
//! the run before the first installer step.

use crate::core::error::ProvisionError;
use crate::runner::{CommandRunner, CommandSpec};
use regex::Regex;
use std::fmt;

/// Required interpreter series (major, minor)
pub const REQUIRED_PYTHON: (u32, u32) = (3, 10);

/// A parsed interpreter version triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl PythonVersion {
    /// Extract the first major.minor.patch triple from interpreter output
    /// such as "Python 3.10.12"
    pub fn parse(text: &str) -> Option<Self> {
        let re = Regex::new(r"(\d+)\.(\d+)\.(\d+)").ok()?;
        let caps = re.captures(text)?;
        Some(Self {
            major: caps.get(1)?.as_str().parse().ok()?,
            minor: caps.get(2)?.as_str().parse().ok()?,
            patch: caps.get(3)?.as_str().parse().ok()?,
        })
    }

    pub fn series(&self) -> (u32, u32) {
        (self.major, self.minor)
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Check that python3 is present and reports the required series
///
/// Read-only: the interpreter is invoked once with `--version` and nothing
/// else. Any outcome other than a parseable, matching version aborts the
/// run as a precondition failure.
pub async fn ensure_interpreter<R: CommandRunner + ?Sized>(
    runner: &R,
    required: (u32, u32),
) -> Result<PythonVersion, ProvisionError> {
    let spec = CommandSpec::new("python3").arg("--version");

    let output = runner.capture(&spec).await.map_err(|err| {
        ProvisionError::Precondition(format!("python3 interpreter not found: {}", err))
    })?;

    if !output.success {
        return Err(ProvisionError::Precondition(format!(
            "python3 --version exited with code {}",
            output.code
        )));
    }

    // Older interpreters printed the version to stderr, current ones to
    // stdout; accept either.
    let text = format!("{} {}", output.stdout.trim(), output.stderr.trim());

    let version = PythonVersion::parse(&text).ok_or_else(|| {
        ProvisionError::Precondition(format!(
            "could not parse an interpreter version from `{}`",
            text.trim()
        ))
    })?;

    if version.series() != required {
        return Err(ProvisionError::Precondition(format!(
            "python {}.{} is required, found {}",
            required.0, required.1, version
        )));
    }

    Ok(version)
}
