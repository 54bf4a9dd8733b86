//! Service layer.
//!
//! Services sit between the repository and the front end: `JobService`
//! owns the query cache and its invalidation, `ActionOrchestrator` runs
//! user actions through confirmation, execution and notification.

mod job_service;
pub mod notifications;
mod orchestrator;

pub use job_service::{JobService, QueryValue};
pub use notifications::NotificationService;
pub use orchestrator::{
    ActionKind, ActionOrchestrator, ActionPhase, JobRef, PendingAction, RequestOutcome,
};
