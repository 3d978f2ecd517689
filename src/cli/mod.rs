//! Command Line Interface module
//!
//! This module contains the CLI argument parsing, the one-shot command implementations
//! and the terminal dashboard.

pub mod args;
pub mod commands;
pub mod tui;

pub use args::*;

use anyhow::Result;

use crate::config::AppConfig;
use crate::utils::logging::init_cli_logging;

/// Main CLI application runner
pub async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_cli_logging(cli.verbose, cli.quiet, cli.is_dashboard())?;

    let config = AppConfig::load(cli.config.as_deref())?.with_server_url(cli.server_url.clone())?;
    log::debug!("Using pool service at {}", config.server_url);

    match cli.command.clone() {
        Some(Commands::Dashboard) | None => tui::run_tui(config).await,
        Some(command) => commands::execute_command(command, &config).await,
    }
}
