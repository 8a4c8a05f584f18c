//! CLI command definitions

use clap::Args;

/// Probe every step's artifact and report its state
#[derive(Debug, Args, Clone, Default)]
pub struct StatusCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// List the provisioning steps in execution order
#[derive(Debug, Args, Clone, Default)]
pub struct ListCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
