//! Domain model: steps, plan, probes, run state, environment context

pub mod config;
pub mod env;
pub mod error;
pub mod plan;
pub mod probe;
pub mod state;
pub mod step;
pub mod validate;

pub use config::{ProvisionConfig, RepoSpec};
pub use env::EnvContext;
pub use error::ProvisionError;
pub use plan::Plan;
pub use probe::{Probe, ProbeError};
pub use state::{RunReport, RunState, StepOutcome, StepRecord};
pub use step::{Action, Step};
pub use validate::{ensure_interpreter, PythonVersion, REQUIRED_PYTHON};
