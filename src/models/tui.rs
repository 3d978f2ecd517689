//! Dashboard-specific data models

use ratatui::style::Color;

use crate::models::device::SessionStatus;
use crate::panel::confirm::{DELETE_DEVICE_PROMPT, STOP_SESSION_PROMPT};

/// Which pane is currently focused in the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    DeviceTable,
    Form,
    Output,
}

impl FocusedPane {
    pub fn next(&self) -> FocusedPane {
        match self {
            FocusedPane::DeviceTable => FocusedPane::Form,
            FocusedPane::Form => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::DeviceTable,
        }
    }
}

/// Destructive action waiting for the confirmation modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Delete(String),
    Stop(String),
}

impl PendingAction {
    pub fn prompt(&self) -> &'static str {
        match self {
            PendingAction::Delete(_) => DELETE_DEVICE_PROMPT,
            PendingAction::Stop(_) => STOP_SESSION_PROMPT,
        }
    }

    pub fn title(&self) -> String {
        match self {
            PendingAction::Delete(serial) => format!("Delete {}", serial),
            PendingAction::Stop(serial) => format!("Stop session {}", serial),
        }
    }

    pub fn serial(&self) -> &str {
        match self {
            PendingAction::Delete(serial) | PendingAction::Stop(serial) => serial,
        }
    }
}

/// Symbol and color of a status cell; `None` is a master
pub fn status_style(status: Option<SessionStatus>) -> (&'static str, Color) {
    match status {
        Some(SessionStatus::Running) => ("🟢", Color::Green),
        Some(SessionStatus::Stopped) => ("⚪", Color::Gray),
        None => ("  ", Color::DarkGray),
    }
}
