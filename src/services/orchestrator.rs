//! Sequencing of user-initiated job actions.
//!
//! ```text
//! idle ──request(pause|resume|delete)──> confirming ──confirm──> executing ──> idle
//!   │                                        │
//!   │                                        └──cancel──> idle
//!   └──request(run_now) / submit(draft)──────────────────> executing ──> idle
//! ```
//!
//! While an action awaits confirmation, only confirm, cancel or a
//! replacing pause/resume/delete request are accepted.
//!
//! Only one action executes at a time. Every executed action ends in
//! exactly one notification and a return to idle, whatever the outcome.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::job_service::JobService;
use super::notifications::{Notification, NotificationService};
use crate::error::{AppError, AppResult};
use crate::models::Job;
use crate::validation::{JobDraft, validate_draft};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    RunNow,
    Pause,
    Resume,
    Delete,
    Create,
}

impl ActionKind {
    /// Destructive or state-changing actions wait for explicit confirmation.
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, ActionKind::Pause | ActionKind::Resume | ActionKind::Delete)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::RunNow => "run",
            ActionKind::Pause => "pause",
            ActionKind::Resume => "resume",
            ActionKind::Delete => "delete",
            ActionKind::Create => "create",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the job an action targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRef {
    pub id: String,
    pub name: String,
}

impl JobRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Name used in notifications; falls back to the id for unnamed jobs.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

impl From<&Job> for JobRef {
    fn from(job: &Job) -> Self {
        Self::new(job.id.clone(), job.name.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub kind: ActionKind,
    pub job: JobRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActionPhase {
    #[default]
    Idle,
    Confirming(PendingAction),
    Executing(PendingAction),
}

/// Result of [`ActionOrchestrator::request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The action waits for [`ActionOrchestrator::confirm`].
    AwaitingConfirmation(PendingAction),
    /// The action ran immediately.
    Completed(Notification),
}

/// Resets the phase to idle when execution ends, including when the
/// executing future is dropped.
struct ExecutionGuard<'a> {
    phase: &'a Mutex<ActionPhase>,
}

impl Drop for ExecutionGuard<'_> {
    fn drop(&mut self) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = ActionPhase::Idle;
    }
}

pub struct ActionOrchestrator {
    jobs: JobService,
    notifications: NotificationService,
    phase: Mutex<ActionPhase>,
}

impl ActionOrchestrator {
    pub fn new(jobs: JobService, notifications: NotificationService) -> Self {
        Self {
            jobs,
            notifications,
            phase: Mutex::new(ActionPhase::Idle),
        }
    }

    fn lock_phase(&self) -> MutexGuard<'_, ActionPhase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self) -> ActionPhase {
        self.lock_phase().clone()
    }

    /// Whether an action is executing; front ends disable every action
    /// affordance while this is true.
    pub fn is_busy(&self) -> bool {
        matches!(*self.lock_phase(), ActionPhase::Executing(_))
    }

    /// Signals the intent to run `kind` against `job`.
    ///
    /// Pause, resume and delete move to confirming, replacing any action
    /// already awaiting confirmation. Run-now executes at once, and is
    /// rejected while another action awaits confirmation.
    pub async fn request(&self, kind: ActionKind, job: JobRef) -> AppResult<RequestOutcome> {
        if kind == ActionKind::Create {
            return Err(AppError::rejected("Jobs are created by submitting a draft"));
        }

        let action = PendingAction { kind, job };
        {
            let mut phase = self.lock_phase();
            if let ActionPhase::Executing(running) = &*phase {
                return Err(AppError::rejected(format!(
                    "Cannot {} job while {} is in progress",
                    kind, running.kind
                )));
            }
            if let ActionPhase::Confirming(pending) = &*phase
                && !kind.requires_confirmation()
            {
                return Err(AppError::rejected(format!(
                    "Cannot {} job while {} is awaiting confirmation",
                    kind, pending.kind
                )));
            }
            if kind.requires_confirmation() {
                tracing::debug!(action = %kind, job_id = %action.job.id, "Awaiting confirmation");
                *phase = ActionPhase::Confirming(action.clone());
                return Ok(RequestOutcome::AwaitingConfirmation(action));
            }
            *phase = ActionPhase::Executing(action.clone());
        }

        Ok(RequestOutcome::Completed(self.execute(action).await))
    }

    /// Runs the action awaiting confirmation.
    pub async fn confirm(&self) -> AppResult<Notification> {
        let action = {
            let mut phase = self.lock_phase();
            match std::mem::take(&mut *phase) {
                ActionPhase::Confirming(action) => {
                    *phase = ActionPhase::Executing(action.clone());
                    action
                }
                other => {
                    let reason = match &other {
                        ActionPhase::Executing(running) => {
                            format!("{} is already in progress", running.kind)
                        }
                        _ => "No action is awaiting confirmation".to_string(),
                    };
                    *phase = other;
                    return Err(AppError::rejected(reason));
                }
            }
        };

        Ok(self.execute(action).await)
    }

    /// Discards the action awaiting confirmation. Has no effect on an
    /// executing action.
    pub fn cancel(&self) -> Option<PendingAction> {
        let mut phase = self.lock_phase();
        if !matches!(*phase, ActionPhase::Confirming(_)) {
            return None;
        }
        match std::mem::take(&mut *phase) {
            ActionPhase::Confirming(action) => {
                tracing::debug!(action = %action.kind, job_id = %action.job.id, "Cancelled");
                Some(action)
            }
            other => {
                *phase = other;
                None
            }
        }
    }

    /// Validates `draft` and creates the job.
    ///
    /// Field errors are returned as [`AppError::Validation`] without a
    /// notification or a backend call.
    pub async fn submit(&self, draft: &JobDraft) -> AppResult<Notification> {
        let input = validate_draft(draft)?;

        {
            let mut phase = self.lock_phase();
            match &*phase {
                ActionPhase::Executing(running) => {
                    return Err(AppError::rejected(format!(
                        "Cannot create job while {} is in progress",
                        running.kind
                    )));
                }
                ActionPhase::Confirming(pending) => {
                    return Err(AppError::rejected(format!(
                        "Cannot create job while {} is awaiting confirmation",
                        pending.kind
                    )));
                }
                ActionPhase::Idle => {}
            }
            *phase = ActionPhase::Executing(PendingAction {
                kind: ActionKind::Create,
                job: JobRef::new(String::new(), input.name()),
            });
        }
        let guard = ExecutionGuard { phase: &self.phase };

        let notification = match self.jobs.create_job(&input).await {
            Ok(job) => {
                tracing::info!(job_id = %job.id, name = %input.name(), "Job created");
                Notification::success("Job created", "Your job has been scheduled.")
            }
            Err(e) => {
                tracing::error!(name = %input.name(), error = %e, "Failed to create job");
                Notification::error("Failed to create job", e.notification_message())
            }
        };

        drop(guard);
        self.notifications.dispatch(&notification).await;
        Ok(notification)
    }

    async fn execute(&self, action: PendingAction) -> Notification {
        let guard = ExecutionGuard { phase: &self.phase };
        let PendingAction { kind, job } = action;
        let id = job.id.as_str();
        let name = job.display_name().to_string();

        let notification = match kind {
            ActionKind::RunNow => match self.jobs.run_now(id).await {
                Ok(triggered) => {
                    if !triggered {
                        tracing::warn!(job_id = %id, "Backend did not confirm the run");
                    }
                    tracing::info!(job_id = %id, "Job triggered");
                    Notification::success("Job triggered", "Job will run shortly.")
                }
                Err(e) => {
                    tracing::error!(job_id = %id, error = %e, "Failed to run job");
                    Notification::error("Failed to run job", e.notification_message())
                }
            },
            ActionKind::Pause => {
                Self::outcome(kind, id, self.jobs.pause(id).await.map(|_| ()), "Job paused", &name)
            }
            ActionKind::Resume => {
                Self::outcome(kind, id, self.jobs.resume(id).await.map(|_| ()), "Job resumed", &name)
            }
            ActionKind::Delete => {
                let result = self.jobs.delete(id).await.map(|deleted| {
                    if !deleted {
                        tracing::warn!(job_id = %id, "Backend did not confirm the deletion");
                    }
                });
                Self::outcome(kind, id, result, "Job deleted", &name)
            }
            ActionKind::Create => Notification::error("Action failed", "Unknown error"),
        };

        drop(guard);
        self.notifications.dispatch(&notification).await;
        notification
    }

    fn outcome(
        kind: ActionKind,
        id: &str,
        result: AppResult<()>,
        success_title: &str,
        name: &str,
    ) -> Notification {
        match result {
            Ok(()) => {
                tracing::info!(action = %kind, job_id = %id, "{}", success_title);
                Notification::success(success_title, name)
            }
            Err(e) => {
                tracing::error!(action = %kind, job_id = %id, error = %e, "Action failed");
                Notification::error("Action failed", e.notification_message())
            }
        }
    }
}
