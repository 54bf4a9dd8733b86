//! Core notification sink trait and types.
//!
//! Every completed user action produces exactly one [`Notification`]. Sinks
//! decide how it reaches the operator (terminal, log, UI channel).

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Outcome message of a user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Ephemeral identifier, only used to tell entries apart.
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub severity: Severity,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, Some(description.into()), Severity::Success)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, Some(description.into()), Severity::Error)
    }

    pub fn new(title: impl Into<String>, description: Option<String>, severity: Severity) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description,
            severity,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Destination for action notifications.
///
/// Uses `async_trait` so sinks can be stored as trait objects.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers one notification.
    async fn notify(&self, notification: &Notification) -> AppResult<()>;

    /// Sink name for logging.
    fn name(&self) -> &'static str;
}
