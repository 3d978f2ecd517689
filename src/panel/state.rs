//! Panel state owned by the controller
//!
//! All mutable client-side state lives in one [`PanelState`]. The controller keeps it behind
//! a mutex and only ever holds the lock for synchronous updates, never across a request.

use std::collections::HashSet;
use tokio::task::AbortHandle;
use tokio::time::Instant;

use super::busy::{BusyKey, SessionAction};
use super::form::DeviceForm;
use super::notify::{Notification, Notifications};
use super::output::{ConsoleContent, OutputViewer};
use crate::config::PanelSettings;
use crate::models::device::Device;

/// What a device list replacement changed besides the list itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotChanges {
    /// The selected rover vanished and the viewer went back to idle
    pub selection_reset: bool,
    /// The edited device vanished and the form went back to create mode
    pub form_reset: bool,
}

#[derive(Debug)]
pub struct PanelState {
    /// Latest server snapshot, replaced wholesale
    pub devices: Vec<Device>,
    pub form: DeviceForm,
    pub output: OutputViewer,
    pub notifications: Notifications,
    pub(crate) refresh_task: Option<AbortHandle>,
}

impl PanelState {
    pub fn new(settings: &PanelSettings) -> Self {
        Self {
            devices: Vec::new(),
            form: DeviceForm::new(),
            output: OutputViewer::new(),
            notifications: Notifications::new(settings.notification_ttl),
            refresh_task: None,
        }
    }

    pub fn device(&self, serial: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.serial == serial)
    }

    pub fn rovers(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(|d| d.is_rover())
    }

    /// Cached session state of a rover, from the last refresh
    pub fn is_session_running(&self, serial: &str) -> bool {
        self.device(serial).is_some_and(Device::is_session_running)
    }

    /// Replace the device snapshot and reconcile the views derived from it
    pub fn apply_devices(
        &mut self,
        devices: Vec<Device>,
        reset_orphaned_edit: bool,
    ) -> SnapshotChanges {
        self.devices = devices;
        let mut changes = SnapshotChanges::default();

        if let Some(selected) = self.output.selected().map(str::to_string) {
            if !self.rovers().any(|r| r.serial == selected) {
                self.output.select(None);
                changes.selection_reset = true;
            }
        }

        if reset_orphaned_edit {
            if let Some(serial) = self.form.editing_serial().map(str::to_string) {
                if self.device(&serial).is_none() {
                    self.form.reset();
                    changes.form_reset = true;
                }
            }
        }

        changes
    }

    pub fn snapshot(&self, busy: HashSet<BusyKey>, now: Instant) -> PanelSnapshot {
        PanelSnapshot {
            devices: self.devices.clone(),
            form: self.form.clone(),
            selected_output: self.output.selected().map(str::to_string),
            console: self.output.console().clone(),
            output_polling: self.output.is_polling(),
            busy,
            notifications: self.notifications.active(now),
        }
    }
}

/// Immutable copy of everything the renderers need
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSnapshot {
    pub devices: Vec<Device>,
    pub form: DeviceForm,
    pub selected_output: Option<String>,
    pub console: ConsoleContent,
    pub output_polling: bool,
    pub busy: HashSet<BusyKey>,
    pub notifications: Vec<Notification>,
}

impl PanelSnapshot {
    pub fn rovers(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(|d| d.is_rover())
    }

    pub fn is_busy(&self, serial: &str, action: SessionAction) -> bool {
        self.busy.contains(&BusyKey::new(serial, action))
    }
}
