//! Command execution seam - every external tool is invoked through here

pub mod system;

use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub use system::SystemRunner;

/// A fully described external command, ready to be spawned
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Program name or path
    pub program: String,

    /// Arguments passed verbatim
    pub args: Vec<String>,

    /// Working directory (inherited if unset)
    pub cwd: Option<PathBuf>,

    /// Extra environment variables for the child process
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    /// Create a spec for a program with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    /// Create a spec that runs a script through `sh -c`
    ///
    /// Used for the handful of steps that genuinely need shell features
    /// (pipelines into `tee`, `&&` chains with a sourced environment).
    pub fn shell(script: impl Into<String>) -> Self {
        Self::new("sh").arg("-c").arg(script)
    }

    /// Append a single argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Add an environment variable for the child process
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.chars().any(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Exit status and captured streams of a finished command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code (-1 when terminated by a signal)
    pub code: i32,

    /// Whether the command exited zero
    pub success: bool,

    /// Captured stdout (empty when the command ran with inherited stdout)
    pub stdout: String,

    /// Captured stderr
    pub stderr: String,
}

impl CommandOutput {
    /// Last `max_lines` of stderr, trimmed, for failure messages
    pub fn stderr_tail(&self, max_lines: usize) -> String {
        let lines: Vec<&str> = self.stderr.trim().lines().collect();
        let start = lines.len().saturating_sub(max_lines);
        lines[start..].join("\n")
    }
}

/// Errors from the runner itself - a nonzero exit is NOT a runner error,
/// it is reported through `CommandOutput`
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("failed to collect output of `{program}`: {source}")]
    Wait {
        program: String,
        source: std::io::Error,
    },
}

/// Trait for running external commands - allows for a mock implementation
/// in tests
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command, letting its stdout flow to the operator's terminal.
    /// Stderr is captured so failures can be reported with context.
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, RunnerError>;

    /// Run a command and capture both streams. Used for read-only probes
    /// and version checks whose output must be inspected, not shown.
    async fn capture(&self, spec: &CommandSpec) -> Result<CommandOutput, RunnerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_plain_command() {
        let spec = CommandSpec::new("git").args(["clone", "https://example.com/repo.git"]);
        assert_eq!(spec.to_string(), "git clone https://example.com/repo.git");
    }

    #[test]
    fn test_display_quotes_whitespace_args() {
        let spec = CommandSpec::shell("command -v gz");
        assert_eq!(spec.to_string(), "sh -c \"command -v gz\"");
    }

    #[test]
    fn test_stderr_tail() {
        let output = CommandOutput {
            code: 1,
            success: false,
            stdout: String::new(),
            stderr: "a\nb\nc\nd\n".to_string(),
        };
        assert_eq!(output.stderr_tail(2), "c\nd");
        assert_eq!(output.stderr_tail(10), "a\nb\nc\nd");
    }
}
