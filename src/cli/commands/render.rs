//! Render command: print the admin panel markup

use anyhow::Result;

use super::connect;
use crate::config::AppConfig;

pub async fn execute_render_command(config: &AppConfig) -> Result<()> {
    let panel = connect(config, None)?;
    // A failed refresh still renders, with the error as an alert
    if let Err(e) = panel.refresh().await {
        log::warn!("Rendering without device list: {}", e);
    }

    print!("{}", panel.render().to_document());
    Ok(())
}
