use async_trait::async_trait;

use super::provider::{Notification, NotificationSink, Severity};
use crate::error::AppResult;

/// Writes notifications to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSink for LogNotifier {
    async fn notify(&self, notification: &Notification) -> AppResult<()> {
        let description = notification.description.as_deref().unwrap_or("");
        match notification.severity {
            Severity::Success => tracing::info!(
                id = %notification.id,
                title = %notification.title,
                description,
                "Action succeeded"
            ),
            Severity::Error => tracing::error!(
                id = %notification.id,
                title = %notification.title,
                description,
                "Action failed"
            ),
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
