//! Fan-out of action notifications to the configured sinks.

use std::sync::Arc;

use super::provider::{Notification, NotificationSink};

/// Delivers every notification to all registered sinks.
///
/// A failing sink is logged and skipped; it never fails the action that
/// produced the notification.
#[derive(Clone, Default)]
pub struct NotificationService {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl NotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub async fn dispatch(&self, notification: &Notification) {
        for sink in &self.sinks {
            if let Err(e) = sink.notify(notification).await {
                tracing::warn!(
                    sink = sink.name(),
                    error = %e,
                    "Failed to deliver notification"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult};
    use crate::services::notifications::BroadcastNotifier;
    use async_trait::async_trait;

    struct FailingSink;

    #[async_trait]
    impl NotificationSink for FailingSink {
        async fn notify(&self, _notification: &Notification) -> AppResult<()> {
            Err(AppError::transport("sink offline"))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_failing_sink_does_not_block_others() {
        let broadcast = BroadcastNotifier::new(4);
        let mut rx = broadcast.subscribe();
        let service = NotificationService::new()
            .with_sink(Arc::new(FailingSink))
            .with_sink(Arc::new(broadcast));

        let n = Notification::success("Job created", "Your job has been scheduled.");
        service.dispatch(&n).await;

        assert_eq!(rx.recv().await.unwrap().title, "Job created");
        assert_eq!(service.sink_count(), 2);
    }
}
