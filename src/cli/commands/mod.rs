//! CLI command implementations

pub mod devices;
pub mod output;
pub mod render;
pub mod sessions;

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use crate::cli::args::Commands;
use crate::config::AppConfig;
use crate::models::events::AppEvent;
use crate::panel::confirm::{Confirmer, Preconfirmed, StdinConfirmer};
use crate::panel::controller::{ActionOutcome, AdminPanel};
use crate::remote::client::HttpPoolClient;

/// Execute a CLI command
pub async fn execute_command(command: Commands, config: &AppConfig) -> Result<()> {
    match command {
        Commands::List => devices::execute_list_command(config).await,
        Commands::Add {
            name,
            serial,
            ip,
            port,
            role,
        } => devices::execute_add_command(config, &name, &serial, &ip, &port, role).await,
        Commands::Update {
            serial,
            name,
            ip,
            port,
            role,
        } => devices::execute_update_command(config, &serial, name, ip, port, role).await,
        Commands::Delete { serial, yes } => {
            devices::execute_delete_command(config, &serial, yes).await
        }
        Commands::Start { serial } => sessions::execute_start_command(config, &serial).await,
        Commands::Stop { serial, yes } => {
            sessions::execute_stop_command(config, &serial, yes).await
        }
        Commands::Status { serial } => sessions::execute_status_command(config, &serial).await,
        Commands::Output { serial, follow } => {
            output::execute_output_command(config, &serial, follow).await
        }
        Commands::Render => render::execute_render_command(config).await,
        Commands::Dashboard => crate::cli::tui::run_tui(config.clone()).await,
    }
}

/// Admin panel talking to the configured pool service
pub fn connect(config: &AppConfig, events: Option<UnboundedSender<AppEvent>>) -> Result<AdminPanel> {
    let client = HttpPoolClient::new(&config.server_url, config.request_timeout())?;
    Ok(AdminPanel::with_events(
        Arc::new(client),
        config.panel_settings(),
        events,
    ))
}

/// Confirmation source for destructive commands
pub fn confirmer(assume_yes: bool) -> Box<dyn Confirmer> {
    if assume_yes {
        Box::new(Preconfirmed)
    } else {
        Box::new(StdinConfirmer)
    }
}

/// Print the outcome of an action; failures become the command's error
pub fn report(outcome: ActionOutcome) -> Result<()> {
    match outcome {
        ActionOutcome::Completed(message) => {
            println!("✅ {}", message);
            Ok(())
        }
        ActionOutcome::Declined => {
            println!("❎ Cancelled");
            Ok(())
        }
        ActionOutcome::Busy => Err(anyhow::anyhow!("Action already in progress")),
        ActionOutcome::Failed(err) => Err(err.into()),
    }
}
