//! Device registry commands: list, add, update, delete

use anyhow::Result;

use super::{confirmer, connect, report};
use crate::config::AppConfig;
use crate::models::device::{Device, PLACEHOLDER, Role};
use crate::panel::form::FormField;

const HEADERS: [&str; 8] = ["NAME", "SERIAL", "ENDPOINT", "ROLE", "STATUS", "X", "Y", "Z"];

/// Plain-text device table for the terminal
pub fn format_device_table(devices: &[Device]) -> String {
    let rows: Vec<[String; 8]> = devices
        .iter()
        .map(|d| {
            let [x, y, z] = d.coordinate_texts();
            let text = |v: Option<String>| v.unwrap_or_else(|| PLACEHOLDER.to_string());
            [
                d.name.clone(),
                d.serial.clone(),
                d.endpoint(),
                d.role.to_string(),
                d.effective_status()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
                text(x),
                text(y),
                text(z),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let mut lines = vec![format_row(&header[..])];
    lines.extend(rows.iter().map(|row| format_row(&row[..])));
    lines.join("\n")
}

pub async fn execute_list_command(config: &AppConfig) -> Result<()> {
    let panel = connect(config, None)?;
    let count = panel.refresh().await?;

    if count == 0 {
        println!("⚠️  No devices configured on {}", config.server_url);
        return Ok(());
    }

    println!("📡 Found {} device(s) on {}:", count, config.server_url);
    println!();
    println!("{}", format_device_table(&panel.devices()));
    Ok(())
}

pub async fn execute_add_command(
    config: &AppConfig,
    name: &str,
    serial: &str,
    ip: &str,
    port: &str,
    role: Role,
) -> Result<()> {
    let panel = connect(config, None)?;

    panel.set_form_field(FormField::Name, name);
    panel.set_form_field(FormField::Serial, serial);
    panel.set_form_field(FormField::Ip, ip);
    panel.set_form_field(FormField::Port, port);
    panel.set_form_field(FormField::Role, role.name());

    println!("➕ Adding {} {} ({})...", role, name, serial);
    report(panel.submit_form().await)
}

pub async fn execute_update_command(
    config: &AppConfig,
    serial: &str,
    name: Option<String>,
    ip: Option<String>,
    port: Option<String>,
    role: Option<Role>,
) -> Result<()> {
    let panel = connect(config, None)?;
    panel.refresh().await?;

    if !panel.begin_edit(serial) {
        return Err(anyhow::anyhow!("Device {} not found", serial));
    }

    let overrides = [
        (FormField::Name, name),
        (FormField::Ip, ip),
        (FormField::Port, port),
        (FormField::Role, role.map(|r| r.name().to_string())),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            panel.set_form_field(field, &value);
        }
    }

    println!("✏️  Updating {}...", serial);
    report(panel.submit_form().await)
}

pub async fn execute_delete_command(config: &AppConfig, serial: &str, yes: bool) -> Result<()> {
    let panel = connect(config, None)?;
    let confirmer = confirmer(yes);

    println!("🗑️  Deleting {}", serial);
    report(panel.delete_device(serial, confirmer.as_ref()).await)
}
