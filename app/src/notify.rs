//! Transient notifications shown to the user.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{error, info, warn};

pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);
pub const STATS_DURATION: Duration = Duration::from_millis(8000);
pub const CONNECTION_ERROR_DURATION: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastLevel {
    pub fn title(self) -> &'static str {
        match self {
            ToastLevel::Success => "Success",
            ToastLevel::Error => "Error",
            ToastLevel::Warning => "Warning",
            ToastLevel::Info => "Information",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub message: String,
    pub duration: Duration,
    pub shown_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.duration
    }
}

/// The visible toast stack, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Toasts {
    next_id: u64,
    items: Vec<Toast>,
}

impl Toasts {
    /// Shows a new toast. Toasts whose time is up are dropped first.
    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>, duration: Duration) -> u64 {
        let now = Instant::now();
        self.expire(now);
        let message = message.into();
        match level {
            ToastLevel::Error => error!(%message, "toast"),
            ToastLevel::Warning => warn!(%message, "toast"),
            ToastLevel::Success | ToastLevel::Info => info!(%message, "toast"),
        }
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Toast {
            id,
            level,
            message,
            duration,
            shown_at: now,
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastLevel::Success, message, DEFAULT_DURATION)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastLevel::Error, message, DEFAULT_DURATION)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastLevel::Warning, message, DEFAULT_DURATION)
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastLevel::Info, message, DEFAULT_DURATION)
    }

    /// Removes the toast with `id`; false if it was already gone.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|toast| toast.id != id);
        self.items.len() != before
    }

    /// Drops every toast whose display time has elapsed at `now`.
    pub fn expire(&mut self, now: Instant) {
        self.items.retain(|toast| !toast.is_expired(now));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn last(&self) -> Option<&Toast> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
