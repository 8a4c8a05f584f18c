//! Pipeline execution

pub mod driver;
pub mod executor;

pub use driver::{Driver, EventHandler, ProvisionEvent};
pub use executor::{StepError, StepExecutor};
