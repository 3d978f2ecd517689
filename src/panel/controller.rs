//! Admin panel controller
//!
//! [`AdminPanel`] wires the pool service to the panel state: it keeps the device snapshot
//! fresh on a fixed cadence, drives the device form, issues session actions and runs the
//! output viewer with its conditional poller.
//!
//! State lives in a single [`PanelState`] behind a mutex. Every handler reads what it needs,
//! releases the lock, awaits the service, then re-locks to apply the whole result at once, so
//! no partially updated state is ever observable while a request is in flight.

use futures_util::future::BoxFuture;
use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::busy::{BusyKey, BusyTracker, SessionAction};
use super::confirm::{Confirmer, DELETE_DEVICE_PROMPT, STOP_SESSION_PROMPT};
use super::form::{DeviceForm, FormField, FormSubmission};
use super::notify::NotificationLevel;
use super::render::{PanelView, render_panel};
use super::state::{PanelSnapshot, PanelState};
use crate::config::PanelSettings;
use crate::errors::{PanelError, Result};
use crate::models::device::{Device, SessionStatus};
use crate::models::events::AppEvent;
use crate::remote::api::{ApiOperation, PoolApi};

/// Result of a user-triggered action
#[derive(Debug)]
pub enum ActionOutcome {
    /// The service accepted the request; carries its confirmation message
    Completed(String),
    /// The request failed; the error was already shown as a notification
    Failed(PanelError),
    /// The user did not confirm
    Declined,
    /// The same control is still waiting on a previous request
    Busy,
}

impl ActionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ActionOutcome::Completed(_))
    }

    /// Text shown to the user for this outcome
    pub fn message(&self) -> String {
        match self {
            ActionOutcome::Completed(message) => message.clone(),
            ActionOutcome::Failed(err) => err.to_string(),
            ActionOutcome::Declined => "Cancelled".to_string(),
            ActionOutcome::Busy => "Action already in progress".to_string(),
        }
    }
}

/// Notification text for a failed device list refresh
pub fn refresh_error_text(err: &PanelError) -> String {
    if err.is_transport() {
        err.to_string()
    } else {
        format!("Failed to load devices: {}", err)
    }
}

/// Inline console text for a failed output fetch
pub fn output_error_text(err: &PanelError) -> String {
    if err.is_transport() {
        err.to_string()
    } else {
        format!("Failed to load output: {}", err)
    }
}

#[derive(Clone)]
pub struct AdminPanel {
    api: Arc<dyn PoolApi>,
    settings: PanelSettings,
    state: Arc<Mutex<PanelState>>,
    busy: BusyTracker,
    events: Option<UnboundedSender<AppEvent>>,
}

impl AdminPanel {
    pub fn new(api: Arc<dyn PoolApi>, settings: PanelSettings) -> Self {
        Self::with_events(api, settings, None)
    }

    /// Panel that reports every visible change on `events`
    pub fn with_events(
        api: Arc<dyn PoolApi>,
        settings: PanelSettings,
        events: Option<UnboundedSender<AppEvent>>,
    ) -> Self {
        let state = PanelState::new(&settings);
        Self {
            api,
            settings,
            state: Arc::new(Mutex::new(state)),
            busy: BusyTracker::new(events.clone()),
            events,
        }
    }

    pub fn settings(&self) -> &PanelSettings {
        &self.settings
    }

    fn state(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: AppEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    fn notify(&self, level: NotificationLevel, message: String) {
        match level {
            NotificationLevel::Error => error!("{}", message),
            _ => info!("{}", message),
        }
        {
            let mut state = self.state();
            state.notifications.prune(Instant::now());
            state.notifications.push(level, message.clone());
        }
        self.emit(AppEvent::Notification(level, message));
    }

    fn fail(&self, operation: ApiOperation, err: PanelError) -> ActionOutcome {
        warn!("{:?} failed: {}", operation, err);
        self.notify(NotificationLevel::Error, err.to_string());
        ActionOutcome::Failed(err)
    }

    // --- Lifecycle ---------------------------------------------------------------------

    /// Start the periodic device refresh. The first refresh runs immediately. Calling it
    /// again while the loop runs does nothing.
    pub fn start(&self) {
        let mut state = self.state();
        if state.refresh_task.is_some() {
            return;
        }

        let panel = self.clone();
        let period = self.settings.refresh_interval;
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let _ = panel.refresh().await;
            }
        });
        debug!("Device refresh scheduled every {:?}", period);
        state.refresh_task = Some(task.abort_handle());
    }

    pub fn is_running(&self) -> bool {
        self.state().refresh_task.is_some()
    }

    /// Cancel every timer owned by the panel
    pub fn shutdown(&self) {
        let (refresh, poller) = {
            let mut state = self.state();
            (state.refresh_task.take(), state.output.cancel_poller())
        };
        if let Some(task) = refresh {
            task.abort();
            debug!("Device refresh cancelled");
        }
        if poller {
            self.emit(AppEvent::OutputPollingChanged(false));
        }
    }

    // --- Device list -------------------------------------------------------------------

    /// Fetch the device list and replace the local snapshot. On failure the previous
    /// snapshot stays and an error notification is raised.
    pub async fn refresh(&self) -> Result<usize> {
        match self.api.list_devices().await {
            Ok(devices) => {
                let count = devices.len();
                let changes = self
                    .state()
                    .apply_devices(devices, self.settings.reset_orphaned_edit);
                debug!("Loaded {} devices", count);

                if changes.selection_reset {
                    debug!("Selected rover no longer listed, output viewer reset");
                    self.emit(AppEvent::OutputPollingChanged(false));
                }
                if changes.form_reset {
                    info!("Device being edited was removed, form reset");
                    self.emit(AppEvent::FormChanged);
                }
                self.emit(AppEvent::DevicesRefreshed(count));
                Ok(count)
            }
            Err(err) => {
                let message = refresh_error_text(&err);
                warn!("Device refresh failed: {}", err);
                self.notify(NotificationLevel::Error, message.clone());
                self.emit(AppEvent::RefreshFailed(message));
                Err(err)
            }
        }
    }

    pub fn devices(&self) -> Vec<Device> {
        self.state().devices.clone()
    }

    pub fn device(&self, serial: &str) -> Option<Device> {
        self.state().device(serial).cloned()
    }

    // --- Device form -------------------------------------------------------------------

    pub fn form(&self) -> DeviceForm {
        self.state().form.clone()
    }

    /// Load a listed device into the form. `false` when the serial is unknown.
    pub fn begin_edit(&self, serial: &str) -> bool {
        let found = {
            let mut state = self.state();
            match state.device(serial).cloned() {
                Some(device) => {
                    state.form.begin_edit(&device);
                    true
                }
                None => false,
            }
        };
        if found {
            debug!("Editing device {}", serial);
            self.emit(AppEvent::FormChanged);
        }
        found
    }

    pub fn cancel_edit(&self) {
        self.state().form.reset();
        self.emit(AppEvent::FormChanged);
    }

    pub fn set_form_field(&self, field: FormField, value: &str) -> bool {
        let accepted = self.state().form.set(field, value);
        if accepted {
            self.emit(AppEvent::FormChanged);
        }
        accepted
    }

    pub fn push_form_char(&self, field: FormField, c: char) -> bool {
        let accepted = self.state().form.push_char(field, c);
        if accepted {
            self.emit(AppEvent::FormChanged);
        }
        accepted
    }

    pub fn pop_form_char(&self, field: FormField) -> bool {
        let accepted = self.state().form.pop_char(field);
        if accepted {
            self.emit(AppEvent::FormChanged);
        }
        accepted
    }

    pub fn toggle_form_role(&self) {
        self.state().form.toggle_role();
        self.emit(AppEvent::FormChanged);
    }

    /// Create or update depending on the form mode. On success the form goes back to an
    /// empty create form, unless the user switched to another edit meanwhile, and the device
    /// list is reloaded. On failure the fields are left as typed.
    pub async fn submit_form(&self) -> ActionOutcome {
        let (mode, submission) = {
            let state = self.state();
            (state.form.mode().clone(), state.form.submission())
        };

        let (operation, result) = match submission {
            FormSubmission::Create(device) => {
                info!("Adding device {}", device.serial);
                (
                    ApiOperation::CreateDevice,
                    self.api.create_device(&device).await,
                )
            }
            FormSubmission::Update { serial, update } => {
                info!("Updating device {}", serial);
                (
                    ApiOperation::UpdateDevice,
                    self.api.update_device(&serial, &update).await,
                )
            }
        };

        match result {
            Ok(message) => {
                {
                    let mut state = self.state();
                    if state.form.mode() == &mode {
                        state.form.reset();
                    }
                }
                self.emit(AppEvent::FormChanged);
                self.notify(NotificationLevel::Success, message.clone());
                let _ = self.refresh().await;
                ActionOutcome::Completed(message)
            }
            Err(err) => self.fail(operation, err),
        }
    }

    /// Delete after confirmation. The form is left alone even when it edits this device.
    pub async fn delete_device(&self, serial: &str, confirmer: &dyn Confirmer) -> ActionOutcome {
        if !confirmer.confirm(DELETE_DEVICE_PROMPT).await {
            debug!("Delete of {} declined", serial);
            return ActionOutcome::Declined;
        }

        info!("Deleting device {}", serial);
        match self.api.delete_device(serial).await {
            Ok(message) => {
                self.notify(NotificationLevel::Success, message.clone());
                let _ = self.refresh().await;
                ActionOutcome::Completed(message)
            }
            Err(err) => self.fail(ApiOperation::DeleteDevice, err),
        }
    }

    // --- Session control ---------------------------------------------------------------

    pub async fn start_session(&self, serial: &str) -> ActionOutcome {
        self.run_session_action(serial, SessionAction::Start).await
    }

    /// Stop after confirmation
    pub async fn stop_session(&self, serial: &str, confirmer: &dyn Confirmer) -> ActionOutcome {
        if !confirmer.confirm(STOP_SESSION_PROMPT).await {
            debug!("Stop of {} declined", serial);
            return ActionOutcome::Declined;
        }
        self.run_session_action(serial, SessionAction::Stop).await
    }

    /// Issue a start/stop with its control marked busy for the duration of the request.
    /// Session status is not touched here; it changes with the refresh that follows.
    async fn run_session_action(&self, serial: &str, action: SessionAction) -> ActionOutcome {
        let Some(guard) = self.busy.try_acquire(BusyKey::new(serial, action)) else {
            debug!("{} for {} already in flight", action.name(), serial);
            return ActionOutcome::Busy;
        };

        info!("{} session for {}", action.name(), serial);
        let (operation, result) = match action {
            SessionAction::Start => (
                ApiOperation::StartSession,
                self.api.start_session(serial).await,
            ),
            SessionAction::Stop => (
                ApiOperation::StopSession,
                self.api.stop_session(serial).await,
            ),
        };
        drop(guard);

        match result {
            Ok(message) => {
                self.notify(NotificationLevel::Success, message.clone());
                let _ = self.refresh().await;
                ActionOutcome::Completed(message)
            }
            Err(err) => self.fail(operation, err),
        }
    }

    pub fn is_busy(&self, serial: &str, action: SessionAction) -> bool {
        self.busy.is_busy(&BusyKey::new(serial, action))
    }

    /// Ask the service for a session's current status, bypassing the cached snapshot
    pub async fn session_status(&self, serial: &str) -> Result<SessionStatus> {
        let status = self.api.session_status(serial).await;
        if let Err(err) = &status {
            warn!("Status of {} unavailable: {}", serial, err);
        }
        status
    }

    // --- Output viewer -----------------------------------------------------------------

    /// Change the viewed rover (`None` or an empty serial for none). Any running poller is
    /// cancelled before the switch; a new selection is fetched right away.
    pub async fn select_output(&self, serial: Option<&str>) {
        let serial = serial.filter(|s| !s.is_empty()).map(str::to_string);
        let was_polling = {
            let mut state = self.state();
            let was_polling = state.output.is_polling();
            state.output.select(serial.clone());
            was_polling
        };
        if was_polling {
            self.emit(AppEvent::OutputPollingChanged(false));
        }

        if serial.is_some() {
            self.load_output().await;
        }
    }

    pub fn selected_output(&self) -> Option<String> {
        self.state().output.selected().map(str::to_string)
    }

    pub fn output_poller_active(&self) -> bool {
        self.state().output.is_polling()
    }

    /// Fetch the selected rover's output. After a successful fetch the poller runs exactly
    /// when the rover's cached status is running. A failed fetch only shows the error inline.
    pub async fn load_output(&self) {
        let Some(serial) = self.selected_output() else {
            return;
        };

        let result = self.api.session_output(&serial).await;

        let polling_changed = {
            let mut state = self.state();
            if state.output.selected() != Some(serial.as_str()) {
                debug!("Discarding stale output of {}", serial);
                return;
            }

            match result {
                Ok(lines) => {
                    state.output.show_lines(lines);
                    let running = state.is_session_running(&serial);
                    if running && !state.output.is_polling() {
                        let handle = self.spawn_output_poller();
                        state.output.install_poller(handle).then_some(true)
                    } else if !running && state.output.cancel_poller() {
                        Some(false)
                    } else {
                        None
                    }
                }
                Err(err) => {
                    debug!("Output of {} unavailable: {}", serial, err);
                    state.output.show_error(output_error_text(&err));
                    None
                }
            }
        };

        self.emit(AppEvent::OutputUpdated(serial));
        if let Some(active) = polling_changed {
            self.emit(AppEvent::OutputPollingChanged(active));
        }
    }

    fn poll_once(&self) -> BoxFuture<'_, ()> {
        Box::pin(self.load_output())
    }

    /// Recurring output fetch. The first one fires one interval from now.
    fn spawn_output_poller(&self) -> AbortHandle {
        let panel = self.clone();
        let period = self.settings.output_interval;
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                panel.poll_once().await;
            }
        });
        task.abort_handle()
    }

    // --- Rendering ---------------------------------------------------------------------

    pub fn snapshot(&self) -> PanelSnapshot {
        let busy = self.busy.snapshot();
        self.state().snapshot(busy, Instant::now())
    }

    pub fn render(&self) -> PanelView {
        render_panel(&self.snapshot())
    }

    pub fn dismiss_notification(&self, id: u64) -> bool {
        self.state().notifications.dismiss(id)
    }

    /// Drop expired notifications
    pub fn prune_notifications(&self) {
        self.state().notifications.prune(Instant::now());
    }
}
