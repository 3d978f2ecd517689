//! Transient user notifications
//!
//! Notifications auto-dismiss after a fixed time to live and can be dismissed early.

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

impl NotificationLevel {
    /// Suffix of the `alert-*` CSS class
    pub fn css_suffix(&self) -> &'static str {
        match self {
            NotificationLevel::Success => "success",
            NotificationLevel::Info => "info",
            NotificationLevel::Error => "error",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            NotificationLevel::Success => "✅",
            NotificationLevel::Info => "ℹ️ ",
            NotificationLevel::Error => "❌",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
    pub expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct Notifications {
    items: Vec<Notification>,
    ttl: Duration,
    next_id: u64,
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: Vec::new(),
            ttl,
            next_id: 1,
        }
    }

    /// Add a notification expiring one TTL after `now`
    pub fn push_at(&mut self, level: NotificationLevel, message: String, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Notification {
            id,
            level,
            message,
            expires_at: now + self.ttl,
        });
        id
    }

    pub fn push(&mut self, level: NotificationLevel, message: String) -> u64 {
        self.push_at(level, message, Instant::now())
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Drop expired notifications
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|n| n.expires_at > now);
    }

    /// Live notifications, oldest first
    pub fn active(&self, now: Instant) -> Vec<Notification> {
        self.items
            .iter()
            .filter(|n| n.expires_at > now)
            .cloned()
            .collect()
    }

    pub fn latest(&self, now: Instant) -> Option<&Notification> {
        self.items.iter().rev().find(|n| n.expires_at > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_expires_after_ttl() {
        let start = Instant::now();
        let mut notes = Notifications::new(Duration::from_secs(5));
        notes.push_at(NotificationLevel::Error, "boom".to_string(), start);

        assert_eq!(notes.active(start + Duration::from_secs(4)).len(), 1);
        assert!(notes.active(start + Duration::from_secs(5)).is_empty());

        notes.prune(start + Duration::from_secs(6));
        assert!(notes.latest(start).is_none());
    }

    #[test]
    fn test_dismiss_by_id() {
        let now = Instant::now();
        let mut notes = Notifications::new(Duration::from_secs(5));
        let first = notes.push_at(NotificationLevel::Success, "one".to_string(), now);
        let second = notes.push_at(NotificationLevel::Info, "two".to_string(), now);
        assert_ne!(first, second);

        assert!(notes.dismiss(first));
        assert!(!notes.dismiss(first));
        let active = notes.active(now);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "two");
        assert_eq!(notes.latest(now).map(|n| n.id), Some(second));
    }
}
