//! Dashboard state and key handling
//!
//! The dashboard renders from a [`PanelSnapshot`] refreshed after every panel event. Panel
//! operations that reach the service are spawned so the UI keeps drawing while they run.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;

use crate::models::device::Device;
use crate::models::tui::{FocusedPane, PendingAction};
use crate::panel::confirm::Preconfirmed;
use crate::panel::controller::AdminPanel;
use crate::panel::form::FormField;
use crate::panel::state::PanelSnapshot;

/// What the event loop should do after a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

pub struct DashboardApp {
    pub panel: AdminPanel,
    pub server_url: String,
    pub snapshot: PanelSnapshot,
    pub focused_pane: FocusedPane,
    pub table_state: TableState,
    pub form_field: FormField,
    pub pending: Option<PendingAction>,
    pub show_help: bool,
}

impl DashboardApp {
    pub fn new(panel: AdminPanel, server_url: String) -> Self {
        let snapshot = panel.snapshot();
        Self {
            panel,
            server_url,
            snapshot,
            focused_pane: FocusedPane::DeviceTable,
            table_state: TableState::default(),
            form_field: FormField::Name,
            pending: None,
            show_help: false,
        }
    }

    /// Pull the latest panel state
    pub fn sync(&mut self) {
        self.snapshot = self.panel.snapshot();
        let count = self.snapshot.devices.len();
        match self.table_state.selected() {
            _ if count == 0 => self.table_state.select(None),
            None => self.table_state.select(Some(0)),
            Some(row) if row >= count => self.table_state.select(Some(count - 1)),
            Some(_) => {}
        }
    }

    pub fn selected_device(&self) -> Option<&Device> {
        self.table_state
            .selected()
            .and_then(|row| self.snapshot.devices.get(row))
    }

    pub fn next_row(&mut self) {
        let count = self.snapshot.devices.len();
        if count == 0 {
            return;
        }
        let row = self.table_state.selected().map_or(0, |r| (r + 1) % count);
        self.table_state.select(Some(row));
    }

    pub fn previous_row(&mut self) {
        let count = self.snapshot.devices.len();
        if count == 0 {
            return;
        }
        let row = self
            .table_state
            .selected()
            .map_or(0, |r| if r == 0 { count - 1 } else { r - 1 });
        self.table_state.select(Some(row));
    }

    pub fn toggle_focused_pane(&mut self) {
        self.focused_pane = self.focused_pane.next();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return KeyOutcome::Quit;
        }

        if self.pending.is_some() {
            self.handle_modal_key(key.code);
            return KeyOutcome::Continue;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return KeyOutcome::Continue;
        }

        if self.focused_pane == FocusedPane::Form {
            self.handle_form_key(key.code);
            return KeyOutcome::Continue;
        }

        match key.code {
            KeyCode::Char('q') => return KeyOutcome::Quit,
            KeyCode::Tab => self.toggle_focused_pane(),
            KeyCode::Char('h') | KeyCode::Char('?') => self.show_help = true,
            KeyCode::Down | KeyCode::Char('j') => self.next_row(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_row(),
            KeyCode::Char('e') => self.edit_selected(),
            KeyCode::Char('n') => self.new_device(),
            KeyCode::Char('d') => {
                if let Some(device) = self.selected_device() {
                    self.pending = Some(PendingAction::Delete(device.serial.clone()));
                }
            }
            KeyCode::Char('s') => self.start_selected(),
            KeyCode::Char('x') => {
                if let Some(device) = self.selected_device().filter(|d| d.is_rover()) {
                    self.pending = Some(PendingAction::Stop(device.serial.clone()));
                }
            }
            KeyCode::Char('o') => self.view_selected_output(),
            KeyCode::Char(']') => self.cycle_rover(true),
            KeyCode::Char('[') => self.cycle_rover(false),
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Esc => {
                if self.snapshot.form.is_editing() {
                    self.panel.cancel_edit();
                    self.sync();
                }
            }
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn handle_modal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Enter => {
                if let Some(action) = self.pending.take() {
                    self.run_confirmed(action);
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => self.pending = None,
            _ => {}
        }
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Tab => self.toggle_focused_pane(),
            KeyCode::Down => self.form_field = self.form_field.next(),
            KeyCode::Up => self.form_field = self.form_field.previous(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Esc => {
                self.panel.cancel_edit();
                self.form_field = FormField::Name;
                self.focused_pane = FocusedPane::DeviceTable;
            }
            KeyCode::Backspace => {
                self.panel.pop_form_char(self.form_field);
            }
            KeyCode::Char(c) if self.form_field == FormField::Role => {
                if c == ' ' || c.is_alphabetic() {
                    self.panel.toggle_form_role();
                }
            }
            KeyCode::Char(c) => {
                self.panel.push_form_char(self.form_field, c);
            }
            _ => {}
        }
        self.sync();
    }

    pub fn edit_selected(&mut self) {
        let Some(serial) = self.selected_device().map(|d| d.serial.clone()) else {
            return;
        };
        if self.panel.begin_edit(&serial) {
            self.focused_pane = FocusedPane::Form;
            self.form_field = FormField::Name;
        }
        self.sync();
    }

    pub fn new_device(&mut self) {
        self.panel.cancel_edit();
        self.focused_pane = FocusedPane::Form;
        self.form_field = FormField::Name;
        self.sync();
    }

    fn submit_form(&self) {
        let panel = self.panel.clone();
        tokio::spawn(async move {
            panel.submit_form().await;
        });
    }

    fn start_selected(&self) {
        let Some(device) = self.selected_device().filter(|d| d.is_rover()) else {
            return;
        };
        if device.is_session_running() {
            return;
        }
        let panel = self.panel.clone();
        let serial = device.serial.clone();
        tokio::spawn(async move {
            panel.start_session(&serial).await;
        });
    }

    fn run_confirmed(&self, action: PendingAction) {
        let panel = self.panel.clone();
        tokio::spawn(async move {
            match action {
                PendingAction::Delete(serial) => {
                    panel.delete_device(&serial, &Preconfirmed).await;
                }
                PendingAction::Stop(serial) => {
                    panel.stop_session(&serial, &Preconfirmed).await;
                }
            }
        });
    }

    fn view_selected_output(&mut self) {
        let Some(serial) = self
            .selected_device()
            .filter(|d| d.is_rover())
            .map(|d| d.serial.clone())
        else {
            return;
        };
        self.select_output(Some(serial));
    }

    /// Move the rover selector, passing through "none" between the last and first rover
    pub fn cycle_rover(&mut self, forward: bool) {
        let mut choices: Vec<Option<String>> = vec![None];
        choices.extend(self.snapshot.rovers().map(|r| Some(r.serial.clone())));

        let current = choices
            .iter()
            .position(|c| *c == self.snapshot.selected_output)
            .unwrap_or(0);
        let len = choices.len();
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.select_output(choices[next].clone());
    }

    fn select_output(&mut self, serial: Option<String>) {
        let panel = self.panel.clone();
        tokio::spawn(async move {
            panel.select_output(serial.as_deref()).await;
        });
    }

    fn refresh(&self) {
        let panel = self.panel.clone();
        tokio::spawn(async move {
            let _ = panel.refresh().await;
        });
    }
}
