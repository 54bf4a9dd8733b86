//! Keyed store of query results with in-flight de-duplication.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use jiff::Timestamp;
use tokio::sync::broadcast;

use super::events::{CacheEvent, CacheEventKind, KeySubscription};
use super::key::QueryKey;
use super::state::{QuerySnapshot, QueryState};
use crate::error::AppResult;

type SharedFetch<V> = Shared<BoxFuture<'static, AppResult<V>>>;

struct Entry<V> {
    state: QueryState<V>,
    /// Changes on every fetch start and every invalidation. A fetch only
    /// writes its result back while the generation it started under is
    /// still current.
    generation: u64,
    stale: bool,
    in_flight: Option<SharedFetch<V>>,
    updated_at: Option<Timestamp>,
    fetched_at: Option<Instant>,
}

impl<V: Clone> Entry<V> {
    fn new(generation: u64) -> Self {
        Self {
            state: QueryState::Pending,
            generation,
            stale: false,
            in_flight: None,
            updated_at: None,
            fetched_at: None,
        }
    }

    fn is_expired(&self, stale_after: Option<Duration>) -> bool {
        match (stale_after, self.fetched_at) {
            (Some(max_age), Some(fetched_at)) => fetched_at.elapsed() >= max_age,
            _ => false,
        }
    }

    fn fresh_value(&self, stale_after: Option<Duration>) -> Option<V> {
        if self.stale || self.is_expired(stale_after) {
            return None;
        }
        self.state.value().cloned()
    }

    fn complete(&mut self, result: &AppResult<V>) {
        self.state = match result {
            Ok(value) => QueryState::Resolved(value.clone()),
            Err(error) => QueryState::Failed(error.clone()),
        };
        self.stale = false;
        self.in_flight = None;
        self.updated_at = Some(Timestamp::now());
        self.fetched_at = Some(Instant::now());
    }
}

/// Cache of read results keyed by [`QueryKey`].
///
/// Every transition of an entry happens under that entry's map lock, so
/// readers never observe a half-applied update. Cloning is cheap and yields
/// a handle to the same store.
pub struct QueryCache<V> {
    entries: Arc<DashMap<QueryKey, Entry<V>>>,
    generations: Arc<AtomicU64>,
    events: broadcast::Sender<CacheEvent>,
    stale_after: Option<Duration>,
}

impl<V> Clone for QueryCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            generations: Arc::clone(&self.generations),
            events: self.events.clone(),
            stale_after: self.stale_after,
        }
    }
}

impl<V> QueryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// `stale_after` of `None` keeps resolved values fresh until invalidated.
    pub fn new(event_capacity: usize, stale_after: Option<Duration>) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            entries: Arc::new(DashMap::new()),
            generations: Arc::new(AtomicU64::new(0)),
            events,
            stale_after,
        }
    }

    fn next_generation(&self) -> u64 {
        self.generations.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn emit(&self, key: &QueryKey, kind: CacheEventKind) {
        // no subscribers is not an error
        let _ = self.events.send(CacheEvent::new(key.clone(), kind));
    }

    /// Returns the cached value of `key`, fetching it with `fetcher` when
    /// absent, failed, stale or invalidated.
    ///
    /// Concurrent calls for the same key share one fetch; `fetcher` is only
    /// invoked by the caller that starts it. Every joined caller observes
    /// the same result.
    pub async fn fetch<F, Fut>(&self, key: QueryKey, fetcher: F) -> AppResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<V>> + Send + 'static,
    {
        let shared = {
            let generation = self.next_generation();
            let mut entry = self
                .entries
                .entry(key.clone())
                .or_insert_with(|| Entry::new(generation));

            if let Some(value) = entry.fresh_value(self.stale_after) {
                tracing::trace!(key = %key, "Cache hit");
                return Ok(value);
            }

            match &entry.in_flight {
                Some(in_flight) => {
                    tracing::trace!(key = %key, "Joining in-flight fetch");
                    in_flight.clone()
                }
                None => {
                    entry.generation = generation;
                    let shared = self.start_fetch(key.clone(), generation, fetcher());
                    entry.in_flight = Some(shared.clone());
                    tracing::debug!(key = %key, "Fetching");
                    self.emit(&key, CacheEventKind::Fetching);
                    shared
                }
            }
        };

        shared.await
    }

    fn start_fetch<Fut>(&self, key: QueryKey, generation: u64, fetch: Fut) -> SharedFetch<V>
    where
        Fut: Future<Output = AppResult<V>> + Send + 'static,
    {
        let entries = Arc::clone(&self.entries);
        let events = self.events.clone();

        async move {
            let result = fetch.await;

            let applied = match entries.get_mut(&key) {
                Some(mut entry) if entry.generation == generation => {
                    entry.complete(&result);
                    true
                }
                _ => false,
            };

            if applied {
                let kind = if result.is_ok() {
                    CacheEventKind::Resolved
                } else {
                    CacheEventKind::Failed
                };
                let _ = events.send(CacheEvent::new(key, kind));
            } else {
                tracing::debug!(key = %key, "Discarding result of superseded fetch");
            }

            result
        }
        .boxed()
        .shared()
    }

    /// Marks `key` stale and detaches any in-flight fetch, so the next read
    /// issues a fresh call. The event is published even when the key has
    /// never been read.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        let existed = match self.entries.get_mut(key) {
            Some(mut entry) => {
                entry.generation = self.next_generation();
                entry.stale = true;
                entry.in_flight = None;
                true
            }
            None => false,
        };
        tracing::debug!(key = %key, existed, "Invalidated");
        self.emit(key, CacheEventKind::Invalidated);
        existed
    }

    /// Evicts `key`. A fetch still running for it will not re-create it.
    pub fn remove(&self, key: &QueryKey) -> bool {
        let existed = self.entries.remove(key).is_some();
        if existed {
            tracing::debug!(key = %key, "Removed");
            self.emit(key, CacheEventKind::Removed);
        }
        existed
    }

    pub fn snapshot(&self, key: &QueryKey) -> Option<QuerySnapshot<V>> {
        self.entries.get(key).map(|entry| QuerySnapshot {
            state: entry.state.clone(),
            is_fetching: entry.in_flight.is_some(),
            is_stale: entry.stale || entry.is_expired(self.stale_after),
            updated_at: entry.updated_at,
        })
    }

    /// Last resolved value, fresh or not.
    pub fn peek(&self, key: &QueryKey) -> Option<V> {
        self.entries
            .get(key)
            .and_then(|entry| entry.state.value().cloned())
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Receives every cache transition.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    /// Receives the transitions of `key` only.
    pub fn watch(&self, key: QueryKey) -> KeySubscription {
        KeySubscription::new(key, self.events.subscribe())
    }
}
