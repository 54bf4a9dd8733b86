use async_trait::async_trait;
use tokio::sync::broadcast;

use super::provider::{Notification, NotificationSink};
use crate::error::AppResult;

/// Publishes notifications on a broadcast channel for any number of
/// listeners. Sending with no listener attached is not an error.
#[derive(Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl NotificationSink for BroadcastNotifier {
    async fn notify(&self, notification: &Notification) -> AppResult<()> {
        let _ = self.sender.send(notification.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "broadcast"
    }
}
