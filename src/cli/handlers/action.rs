//! State-changing commands: create, run, pause, resume and delete.
//!
//! Every command goes through the [`ActionOrchestrator`], so the terminal
//! gets the same confirmation step and the same notifications as any other
//! front end. The prompt stands in for the confirmation dialog.

use std::sync::Arc;

use crate::cli::console::Prompt;
use crate::error::{AppError, AppResult};
use crate::services::notifications::Notification;
use crate::services::{
    ActionKind, ActionOrchestrator, JobRef, JobService, PendingAction, RequestOutcome,
};
use crate::validation::{JobDraft, PayloadEditor};

/// Raw `create` arguments, exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    pub name: String,
    pub schedule_type: String,
    pub cron: Option<String>,
    pub interval: Option<String>,
    pub initial_delay: Option<String>,
    pub payload: Option<String>,
}

impl CreateArgs {
    /// Builds the draft the orchestrator validates. A payload that is not
    /// valid JSON is reported instead of being silently dropped.
    pub fn into_draft(self) -> AppResult<JobDraft> {
        let mut editor = PayloadEditor::new();
        if let Some(text) = self.payload {
            editor.set_text(text);
        }
        if let Some(error) = editor.error() {
            return Err(error.clone());
        }

        Ok(JobDraft {
            name: self.name,
            schedule_type: self.schedule_type,
            cron_expression: self.cron.unwrap_or_default(),
            interval_seconds: self.interval.unwrap_or_default(),
            initial_delay_seconds: self.initial_delay.unwrap_or_default(),
            payload: editor.into_value(),
        })
    }
}

fn confirmation_question(action: &PendingAction) -> String {
    let title = match action.kind {
        ActionKind::Pause => "Pause job?",
        ActionKind::Resume => "Resume job?",
        _ => "Delete job?",
    };
    format!("{} Job: {}", title, action.job.display_name())
}

pub struct ActionCommandHandler {
    orchestrator: Arc<ActionOrchestrator>,
    jobs: JobService,
    prompt: Arc<dyn Prompt>,
}

impl ActionCommandHandler {
    pub fn new(
        orchestrator: Arc<ActionOrchestrator>,
        jobs: JobService,
        prompt: Arc<dyn Prompt>,
    ) -> Self {
        Self {
            orchestrator,
            jobs,
            prompt,
        }
    }

    pub async fn create(&self, args: CreateArgs) -> AppResult<Notification> {
        let draft = args.into_draft()?;
        self.orchestrator.submit(&draft).await
    }

    /// Runs `kind` against job `id`.
    ///
    /// Returns `None` when the operator declined the confirmation; nothing
    /// is sent to the backend in that case.
    pub async fn perform(
        &self,
        kind: ActionKind,
        id: &str,
        assume_yes: bool,
    ) -> AppResult<Option<Notification>> {
        let job = self.resolve(kind, id).await?;

        let pending = match self.orchestrator.request(kind, job).await? {
            RequestOutcome::Completed(notification) => return Ok(Some(notification)),
            RequestOutcome::AwaitingConfirmation(pending) => pending,
        };

        let confirmed = if assume_yes {
            true
        } else {
            match self.prompt.confirm(&confirmation_question(&pending)).await {
                Ok(answer) => answer,
                Err(e) => {
                    self.orchestrator.cancel();
                    return Err(e);
                }
            }
        };

        if !confirmed {
            self.orchestrator.cancel();
            tracing::info!(action = %kind, job_id = %id, "Declined");
            return Ok(None);
        }

        self.orchestrator.confirm().await.map(Some)
    }

    /// Looks the job up so notifications carry its name, and only offers
    /// pause on running jobs and resume on paused ones.
    async fn resolve(&self, kind: ActionKind, id: &str) -> AppResult<JobRef> {
        let Some(job) = self.jobs.job(Some(id)).await? else {
            return Err(AppError::rejected(format!("Job '{}' not found", id)));
        };
        let job_ref = JobRef::from(job.as_ref());

        match kind {
            ActionKind::Pause if job.is_paused() => Err(AppError::rejected(format!(
                "Job '{}' is already paused",
                job_ref.display_name()
            ))),
            ActionKind::Resume if !job.is_paused() => Err(AppError::rejected(format!(
                "Job '{}' is not paused",
                job_ref.display_name()
            ))),
            _ => Ok(job_ref),
        }
    }
}
