//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{ListCommand, StatusCommand};

/// PX4 + ROS 2 SITL environment provisioner
#[derive(Debug, Parser, Clone)]
#[command(name = "airstrap")]
#[command(version = "0.1.0")]
#[command(about = "Provision a PX4 + ROS 2 SITL development environment", long_about = None)]
pub struct Cli {
    /// Invoked with no subcommand, `up` runs
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a configuration file (defaults to ./airstrap.yaml if present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the provisioning pipeline
    Up,

    /// Probe every step's artifact and report its state, without mutating
    /// anything
    Status(StatusCommand),

    /// List the provisioning steps in execution order
    List(ListCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }
}
