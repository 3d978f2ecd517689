//! Dashboard event loop and handling

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{io, time::Duration};
use tokio::sync::mpsc;

use crate::cli::tui::app::{DashboardApp, KeyOutcome};
use crate::cli::tui::ui::ui;
use crate::models::AppEvent;

/// Run the dashboard until the user quits. `rx` receives the panel's events.
pub async fn run_tui_event_loop(
    mut app: DashboardApp,
    tx: mpsc::UnboundedSender<AppEvent>,
    mut rx: mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Spawn tick generator
    let tx_tick = tx.clone();
    let ticker = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(250));
        loop {
            interval.tick().await;
            if tx_tick.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    app.panel.start();

    let result: Result<()> = loop {
        terminal.draw(|f| ui(f, &app))?;

        tokio::select! {
            _ = tokio::task::spawn_blocking(|| event::poll(Duration::from_millis(50))) => {
                if event::poll(Duration::from_millis(0))? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind == KeyEventKind::Press
                            && app.handle_key(key) == KeyOutcome::Quit
                        {
                            break Ok(());
                        }
                    }
                }
            }

            Some(event) = rx.recv() => {
                match event {
                    AppEvent::Tick => {
                        app.panel.prune_notifications();
                    }
                    AppEvent::RefreshFailed(message) => {
                        log::debug!("Dashboard refresh failed: {}", message);
                    }
                    _ => {}
                }
                app.sync();
            }
        }
    };

    // Cleanup
    ticker.abort();
    app.panel.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
