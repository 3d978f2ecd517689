//! Session commands: start, stop, status

use anyhow::Result;

use super::{confirmer, connect, report};
use crate::config::AppConfig;

pub async fn execute_start_command(config: &AppConfig, serial: &str) -> Result<()> {
    let panel = connect(config, None)?;

    println!("▶️  Starting session for {}...", serial);
    report(panel.start_session(serial).await)
}

pub async fn execute_stop_command(config: &AppConfig, serial: &str, yes: bool) -> Result<()> {
    let panel = connect(config, None)?;
    let confirmer = confirmer(yes);

    println!("⏹️  Stopping session for {}", serial);
    report(panel.stop_session(serial, confirmer.as_ref()).await)
}

pub async fn execute_status_command(config: &AppConfig, serial: &str) -> Result<()> {
    let panel = connect(config, None)?;
    let status = panel.session_status(serial).await?;

    let symbol = if status.is_running() { "🟢" } else { "⚪" };
    println!("{} {}: {}", symbol, serial, status);
    Ok(())
}
