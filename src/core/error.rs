//! Provisioning error taxonomy

use thiserror::Error;

/// Top-level failure of a provisioning run
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProvisionError {
    /// The environment does not meet a hard requirement. Raised before any
    /// mutation begins.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// An install, clone, or build action exited nonzero. The pipeline
    /// aborts at this step; there is no rollback of earlier steps.
    #[error("step `{step}` failed: {reason}")]
    Step { step: String, reason: String },
}
