//! # Notifications
//!
//! What a screen tells the operator after an action. Rendering is up to the
//! front end; screens only produce these values.
//!
//! ```text
//! ┌──────────────────────────┬──────────────────────────────────────────┐
//! │ Outcome                  │ Notification                             │
//! ├──────────────────────────┼──────────────────────────────────────────┤
//! │ create/update/delete ok  │ Toast  { Success, "Customer created" }   │
//! │ backend or network error │ Toast  { Error, "..." }                  │
//! │ form validation failure  │ Alert  { "Phone must be 6 to 15 digits" }│
//! └──────────────────────────┴──────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::fmt;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Error,
}

/// A message for the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Notification {
    /// Transient message.
    Toast { level: Level, message: String },
    /// Blocking message the operator must dismiss.
    Alert { message: String },
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Notification::Toast {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Notification::Toast {
            level: Level::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notification::Toast {
            level: Level::Error,
            message: message.into(),
        }
    }

    pub fn alert(message: impl Into<String>) -> Self {
        Notification::Alert {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notification::Toast { message, .. } | Notification::Alert { message } => message,
        }
    }

    pub fn is_alert(&self) -> bool {
        matches!(self, Notification::Alert { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Notification::Toast {
                level: Level::Error,
                ..
            }
        )
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Toast { level: Level::Success, message } => write!(f, "✔ {message}"),
            Notification::Toast { level: Level::Info, message } => write!(f, "ℹ {message}"),
            Notification::Toast { level: Level::Error, message } => write!(f, "✖ {message}"),
            Notification::Alert { message } => write!(f, "⚠ {message}"),
        }
    }
}

/// Pending notifications of one screen, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Inbox {
    pending: Vec<Notification>,
}

impl Inbox {
    pub fn push(&mut self, notification: Notification) {
        tracing::debug!(%notification, "Notification queued");
        self.pending.push(notification);
    }

    /// Hands over everything queued so far.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    pub fn peek(&self) -> &[Notification] {
        &self.pending
    }
}
