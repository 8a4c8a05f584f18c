//! Step executor - probes one step and applies its action if needed

use crate::core::{Action, Step, StepOutcome};
use crate::runner::{CommandRunner, RunnerError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// How a step action can fail
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error("`{command}` exited with code {code}: {stderr}")]
    Command {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("could not update {}: {source}", path.display())]
    Profile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Executes a single step against a command runner
pub struct StepExecutor<R> {
    runner: R,
}

impl<R: CommandRunner> StepExecutor<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Probe the step's artifact and run the action if it is absent
    ///
    /// A probe that cannot determine the artifact's state is treated as
    /// "absent": the install runs again, which is safe because actions are
    /// idempotent at the artifact level.
    pub async fn execute(&self, step: &Step) -> StepOutcome {
        match step.probe.evaluate(&self.runner).await {
            Ok(true) => {
                warn!("{}: {} already present, skipping", step.id, step.probe.describe());
                return StepOutcome::Skipped;
            }
            Ok(false) => {}
            Err(err) => {
                warn!(
                    "{}: probe could not determine state ({}), treating as absent",
                    step.id, err
                );
            }
        }

        info!("{}: {}", step.id, step.summary);

        match self.apply(&step.action).await {
            Ok(()) => StepOutcome::Succeeded,
            Err(err) => StepOutcome::Failed {
                error: err.to_string(),
            },
        }
    }

    async fn apply(&self, action: &Action) -> Result<(), StepError> {
        match action {
            Action::Commands(specs) => {
                for spec in specs {
                    let output = self.runner.run(spec).await?;
                    if !output.success {
                        return Err(StepError::Command {
                            command: spec.to_string(),
                            code: output.code,
                            stderr: output.stderr_tail(12),
                        });
                    }
                }
                Ok(())
            }
            Action::AppendLine { path, line } => append_line_guarded(path, line).await,
        }
    }
}

/// Append `line` to `path` unless the exact line is already there
///
/// The file is created if missing. The whole file is rewritten rather than
/// opened in append mode so a missing trailing newline in the existing
/// content cannot glue two lines together.
async fn append_line_guarded(path: &Path, line: &str) -> Result<(), StepError> {
    let current = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(source) => {
            return Err(StepError::Profile {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if current.lines().any(|l| l.trim() == line.trim()) {
        debug!("{} already contains the line, leaving it untouched", path.display());
        return Ok(());
    }

    let mut updated = current;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(line);
    updated.push('\n');

    tokio::fs::write(path, updated)
        .await
        .map_err(|source| StepError::Profile {
            path: path.to_path_buf(),
            source,
        })
}
