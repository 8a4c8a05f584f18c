//! Step domain model

use crate::core::probe::Probe;
use crate::runner::CommandSpec;
use std::path::PathBuf;

/// One idempotent unit of provisioning work
///
/// A step owns exactly one artifact. Its probe checks whether that artifact
/// already exists; its action creates it. Re-running a step whose artifact
/// is present is a no-op.
#[derive(Debug, Clone)]
pub struct Step {
    /// Unique step identifier
    pub id: String,

    /// One-line description shown to the operator
    pub summary: String,

    /// Read-only check for the step's artifact
    pub probe: Probe,

    /// The mutating work, performed only when the probe reports absent
    pub action: Action,
}

impl Step {
    pub fn new(
        id: impl Into<String>,
        summary: impl Into<String>,
        probe: Probe,
        action: Action,
    ) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            probe,
            action,
        }
    }
}

/// The mutating side of a step
#[derive(Debug, Clone)]
pub enum Action {
    /// Run commands in declared order, stopping at the first nonzero exit
    Commands(Vec<CommandSpec>),

    /// Append a line to a file unless the exact line is already present.
    /// The file is created if missing. Appending twice leaves exactly one
    /// occurrence of the line.
    AppendLine { path: PathBuf, line: String },
}
