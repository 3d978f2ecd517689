//! Terminal dashboard components

pub mod app;
pub mod event_loop;
pub mod ui;


use anyhow::Result;
use tokio::sync::mpsc;

use crate::cli::commands::connect;
use crate::config::AppConfig;

/// Run the interactive dashboard
pub async fn run_tui(config: AppConfig) -> Result<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    let panel = connect(&config, Some(tx.clone()))?;
    let app = app::DashboardApp::new(panel, config.server_url.clone());
    event_loop::run_tui_event_loop(app, tx, rx).await
}
