//! Command line argument parsing

use crate::models::device::Role;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "roverpool")]
#[command(about = "🛰️ RTK receiver pool admin panel - manage masters, rovers and their sessions")]
pub struct Cli {
    /// Configuration file (defaults to <config dir>/roverpool/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Pool service URL, overrides the configuration file
    #[arg(long, global = true, help = "Pool service URL (default: http://localhost:5000)")]
    pub server_url: Option<String>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Decrease logging verbosity (only errors)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum Commands {
    /// List registered devices
    List,
    /// Register a new device
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        serial: String,
        #[arg(long)]
        ip: String,
        #[arg(long)]
        port: String,
        /// Master or Rover
        #[arg(long, default_value = "Rover")]
        role: Role,
    },
    /// Update a registered device; unspecified fields keep their current value
    Update {
        serial: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        ip: Option<String>,
        #[arg(long)]
        port: Option<String>,
        #[arg(long)]
        role: Option<Role>,
    },
    /// Remove a device
    Delete {
        serial: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Start the processing session of a rover
    Start { serial: String },
    /// Stop the processing session of a rover
    Stop {
        serial: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the session status of a rover as reported by the service
    Status { serial: String },
    /// Show the session output of a rover
    Output {
        serial: String,
        /// Keep following the output while the session runs (Ctrl+C to stop)
        #[arg(short, long)]
        follow: bool,
    },
    /// Print the admin panel as HTML
    Render,
    /// Interactive terminal dashboard (default)
    Dashboard,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Commands that take over the terminal
    pub fn is_dashboard(&self) -> bool {
        matches!(self.command, None | Some(Commands::Dashboard))
    }
}
