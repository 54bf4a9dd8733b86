//! Change notifications published by the query cache.

use jiff::Timestamp;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use super::key::QueryKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEventKind {
    /// A network fetch started for the key.
    Fetching,
    Resolved,
    Failed,
    /// The key was marked stale; the next read re-fetches.
    Invalidated,
    /// The entry was evicted.
    Removed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEvent {
    pub key: QueryKey,
    pub kind: CacheEventKind,
    pub timestamp: Timestamp,
}

impl CacheEvent {
    pub fn new(key: QueryKey, kind: CacheEventKind) -> Self {
        Self {
            key,
            kind,
            timestamp: Timestamp::now(),
        }
    }
}

/// Receiver filtered to the transitions of a single key.
pub struct KeySubscription {
    key: QueryKey,
    receiver: broadcast::Receiver<CacheEvent>,
}

impl KeySubscription {
    pub(super) fn new(key: QueryKey, receiver: broadcast::Receiver<CacheEvent>) -> Self {
        Self { key, receiver }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Waits for the next event of this key. Returns `None` once the cache
    /// is dropped.
    pub async fn recv(&mut self) -> Option<CacheEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.key == self.key => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(key = %self.key, skipped, "Cache subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<CacheEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if event.key == self.key => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}
