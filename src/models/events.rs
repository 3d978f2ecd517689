//! Application events for the dashboard and CLI front-ends

use crate::panel::notify::NotificationLevel;

/// Events emitted by the panel controller so front-ends know when to redraw
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    // Device list events
    DevicesRefreshed(usize), // device count
    RefreshFailed(String),   // user-facing message

    // Output viewer events
    OutputUpdated(String), // serial
    OutputPollingChanged(bool),

    // Form events
    FormChanged,

    // Session control events
    BusyChanged,

    // User feedback
    Notification(NotificationLevel, String),

    // General events
    Tick,
}
