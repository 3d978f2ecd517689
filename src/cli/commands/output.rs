//! Output command: show a rover's session output, optionally following it

use anyhow::Result;
use tokio::sync::mpsc;

use super::connect;
use crate::config::AppConfig;
use crate::models::events::AppEvent;
use crate::panel::controller::AdminPanel;
use crate::panel::output::ConsoleContent;
use crate::panel::render::{CONSOLE_EMPTY, CONSOLE_LOADING, CONSOLE_PROMPT};

/// Lines of `current` not already printed from `previous`.
///
/// Output is a sliding tail, so the longest suffix of `previous` that starts `current` is
/// the overlap; everything after it is new. Without overlap the whole snapshot is new.
pub fn new_lines<'a>(previous: &[String], current: &'a [String]) -> &'a [String] {
    let max_overlap = previous.len().min(current.len());
    for overlap in (1..=max_overlap).rev() {
        if previous[previous.len() - overlap..] == current[..overlap] {
            return &current[overlap..];
        }
    }
    current
}

fn print_console(console: &ConsoleContent, printed: &mut Vec<String>) {
    match console {
        ConsoleContent::Prompt => println!("{}", CONSOLE_PROMPT),
        ConsoleContent::Loading => println!("{}", CONSOLE_LOADING),
        ConsoleContent::Empty => {
            if printed.is_empty() {
                println!("{}", CONSOLE_EMPTY);
            }
        }
        ConsoleContent::Lines(lines) => {
            for line in new_lines(printed, lines) {
                println!("{}", line);
            }
            *printed = lines.clone();
        }
        ConsoleContent::Error(message) => eprintln!("❌ {}", message),
    }
}

pub async fn execute_output_command(config: &AppConfig, serial: &str, follow: bool) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let panel = connect(config, follow.then_some(tx))?;

    panel.refresh().await?;
    match panel.device(serial) {
        Some(device) if device.is_rover() => {}
        Some(_) => return Err(anyhow::anyhow!("{} is not a rover", serial)),
        None => return Err(anyhow::anyhow!("Device {} not found", serial)),
    }

    panel.select_output(Some(serial)).await;
    let mut printed = Vec::new();
    print_console(&panel.snapshot().console, &mut printed);

    if !follow {
        panel.shutdown();
        return Ok(());
    }

    if !panel.output_poller_active() {
        println!("⏹️  Session of {} is not running, nothing to follow", serial);
        panel.shutdown();
        return Ok(());
    }

    println!("📺 === Following {} (Press Ctrl+C to stop) ===", serial);
    panel.start();
    follow_output(&panel, &mut rx, &mut printed).await;
    panel.shutdown();
    Ok(())
}

async fn follow_output(
    panel: &AdminPanel,
    rx: &mut mpsc::UnboundedReceiver<AppEvent>,
    printed: &mut Vec<String>,
) {
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(AppEvent::OutputUpdated(_)) => {
                    print_console(&panel.snapshot().console, printed);
                }
                Some(AppEvent::OutputPollingChanged(false)) => {
                    println!("⏹️  Session is no longer running, stopped following");
                    break;
                }
                Some(_) => {}
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("🛑 Received Ctrl+C, stopping...");
                break;
            }
        }
    }
}
