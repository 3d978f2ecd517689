//! Admin panel: state machines, rendering and the controller that drives them

pub mod busy;
pub mod confirm;
pub mod controller;
pub mod form;
pub mod notify;
pub mod output;
pub mod render;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use busy::{BusyKey, SessionAction};
pub use confirm::{Confirmer, Preconfirmed, StdinConfirmer};
pub use controller::{ActionOutcome, AdminPanel};
pub use form::{DeviceForm, FormField, FormMode};
pub use notify::{Notification, NotificationLevel};
pub use output::ConsoleContent;
pub use render::{PanelView, escape_html, render_panel};
pub use state::PanelSnapshot;
