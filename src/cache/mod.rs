//! Client-side synchronization cache.
//!
//! Each distinct backend read is a keyed entry that moves between
//! pending, resolved and failed states:
//!
//! ```text
//! jobs          -> list of jobs
//! job:{id}      -> single job
//! logs:{jobId}  -> execution logs of a job
//! ```
//!
//! Concurrent reads of the same key share one in-flight fetch. Mutations
//! invalidate the keys they affect so the next read goes to the backend.
//!
//! # Configuration
//!
//! ```toml
//! [cache]
//! stale_after_seconds = 0  # 0 keeps values until invalidated
//! event_capacity = 64
//! ```

mod events;
mod key;
mod state;
mod store;

pub use events::{CacheEvent, CacheEventKind, KeySubscription};
pub use key::QueryKey;
pub use state::{QuerySnapshot, QueryState};
pub use store::QueryCache;

pub use crate::config::settings::CacheConfig;
