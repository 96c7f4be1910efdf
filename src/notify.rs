//! User-facing notifications.
//!
//! Every command path reports through this one surface. Background
//! activity (stream loss, missed polls) never does.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

/// How loudly a notification is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "ok",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A message for the operator
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub raised_at: DateTime<Local>,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            raised_at: Local::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }
}

/// Bounded queue of the most recent notifications, oldest first
#[derive(Debug, Clone)]
pub struct Notifications {
    items: VecDeque<Notification>,
    capacity: usize,
    pushed: usize,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::with_capacity(20)
    }
}

impl Notifications {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            capacity: capacity.max(1),
            pushed: 0,
        }
    }

    /// Record a notification, evicting the oldest when full
    pub fn push(&mut self, notification: Notification) {
        match notification.severity {
            Severity::Error => tracing::error!("{}", notification.message),
            Severity::Warning => tracing::warn!("{}", notification.message),
            _ => tracing::info!("{}", notification.message),
        }
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(notification);
        self.pushed += 1;
    }

    /// Notifications recorded since creation, including evicted ones
    pub fn pushed(&self) -> usize {
        self.pushed
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove the notification at `index` (as yielded by `iter`)
    pub fn dismiss(&mut self, index: usize) {
        self.items.remove(index);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
