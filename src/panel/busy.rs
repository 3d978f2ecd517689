//! Busy indicators for in-flight session actions
//!
//! A [`BusyGuard`] marks one (serial, action) control as busy for as long as it lives. The
//! control is restored when the guard drops, whatever the outcome of the request.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc::UnboundedSender;

use crate::models::events::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionAction {
    Start,
    Stop,
}

impl SessionAction {
    pub fn name(&self) -> &'static str {
        match self {
            SessionAction::Start => "Start",
            SessionAction::Stop => "Stop",
        }
    }
}

/// Identifies one action control in the device table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BusyKey {
    pub serial: String,
    pub action: SessionAction,
}

impl BusyKey {
    pub fn new(serial: &str, action: SessionAction) -> Self {
        Self {
            serial: serial.to_string(),
            action,
        }
    }
}

/// Set of controls currently busy
#[derive(Debug, Clone, Default)]
pub struct BusyTracker {
    keys: Arc<Mutex<HashSet<BusyKey>>>,
    events: Option<UnboundedSender<AppEvent>>,
}

impl BusyTracker {
    pub fn new(events: Option<UnboundedSender<AppEvent>>) -> Self {
        Self {
            keys: Arc::default(),
            events,
        }
    }

    /// Mark `key` busy. `None` when it already is, so a second click is a no-op.
    pub fn try_acquire(&self, key: BusyKey) -> Option<BusyGuard> {
        let inserted = self
            .keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone());
        if !inserted {
            return None;
        }
        self.notify();
        Some(BusyGuard {
            tracker: self.clone(),
            key,
        })
    }

    pub fn is_busy(&self, key: &BusyKey) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    pub fn snapshot(&self) -> HashSet<BusyKey> {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn release(&self, key: &BusyKey) {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        self.notify();
    }

    fn notify(&self) {
        if let Some(tx) = &self.events {
            let _ = tx.send(AppEvent::BusyChanged);
        }
    }
}

/// Releases its control on drop
#[derive(Debug)]
pub struct BusyGuard {
    tracker: BusyTracker,
    key: BusyKey,
}

impl BusyGuard {
    pub fn key(&self) -> &BusyKey {
        &self.key
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.tracker.release(&self.key);
    }
}
