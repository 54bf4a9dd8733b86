use jiff::Timestamp;

use crate::error::AppError;

/// Outcome of the latest fetch of a key.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<V> {
    /// No fetch has completed yet.
    Pending,
    Resolved(V),
    Failed(AppError),
}

impl<V> QueryState<V> {
    pub fn value(&self) -> Option<&V> {
        match self {
            QueryState::Resolved(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            QueryState::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, QueryState::Pending)
    }
}

/// Point-in-time view of a cache entry.
///
/// `is_fetching` is independent of `state`: a refetch keeps the previous
/// value visible until it completes.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySnapshot<V> {
    pub state: QueryState<V>,
    pub is_fetching: bool,
    pub is_stale: bool,
    pub updated_at: Option<Timestamp>,
}
