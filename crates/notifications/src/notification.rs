use std::time::Duration;

use serde::{Deserialize, Serialize};

use yip_core::ValueObject;

/// Display time applied when a notification does not carry its own duration.
pub const DEFAULT_DURATION_MS: u64 = 3000;

/// Intent/visual category of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    #[default]
    Info,
}

/// Screen edge the notification is anchored to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Top,
    Bottom,
}

/// A user-facing status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    #[serde(default)]
    pub severity: Severity,
    /// Display time in milliseconds; `None` means "use the default".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub position: Position,
}

impl ValueObject for Notification {}

impl Notification {
    /// An `info` notification at the default position and duration.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::default(),
            duration_ms: None,
            position: Position::default(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message).with_severity(Severity::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message).with_severity(Severity::Error)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message)
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Effective display time, falling back to `default_ms`.
    pub fn display_duration(&self, default_ms: u64) -> Duration {
        Duration::from_millis(self.duration_ms.unwrap_or(default_ms))
    }
}
