//! Transient toast-style notifications

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use crate::config::DEFAULT_NOTIFICATION_TTL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub created_at: Instant,
    pub auto_hide: Duration,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.auto_hide
    }
}

/// Queue of notifications waiting to be shown, oldest first
#[derive(Debug, Clone)]
pub struct Notifications {
    queue: VecDeque<Notification>,
    ttl: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            ttl,
        }
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>) {
        self.queue.push_back(Notification {
            severity,
            message: message.into(),
            created_at: Instant::now(),
            auto_hide: self.ttl,
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Severity::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, message);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.queue.iter()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.queue.iter().filter(|n| n.severity == severity).count()
    }

    /// The notification currently on screen
    pub fn current(&self) -> Option<&Notification> {
        self.queue.front()
    }

    /// Closes the current notification
    pub fn dismiss(&mut self) -> Option<Notification> {
        self.queue.pop_front()
    }

    /// Drops every notification whose display time has run out
    pub fn prune(&mut self, now: Instant) {
        self.queue.retain(|n| !n.is_expired(now));
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
