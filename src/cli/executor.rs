//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing, configuration loading and state construction.

use std::process::ExitCode;
use std::sync::Arc;

use super::console::{Prompt, StdinPrompt};
use super::handlers::{ActionCommandHandler, CreateArgs, QueryCommandHandler};
use super::parser::{Cli, Commands};
use super::render;
use crate::error::{AppError, AppResult};
use crate::services::ActionKind;
use crate::services::notifications::Notification;
use crate::state::AppState;
use crate::validation::{CRON_HINT, CronPreview, FieldErrors, describe_cron};

/// What a command wants written to the terminal.
///
/// Action notifications are not part of the report; the console sink
/// prints them as they are dispatched.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandReport {
    pub stdout: String,
    pub stderr: String,
    pub failed: bool,
}

impl CommandReport {
    fn output(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            ..Default::default()
        }
    }

    fn failure(stderr: impl Into<String>) -> Self {
        Self {
            stderr: stderr.into(),
            failed: true,
            ..Default::default()
        }
    }

    fn from_notification(notification: &Notification) -> Self {
        Self {
            failed: notification.is_error(),
            ..Default::default()
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Execute the parsed command against `state` and print its report
///
/// # Errors
/// Returns errors the command cannot report on its own, such as an action
/// rejected by the orchestrator or a missing job
pub async fn execute_command(cli: &Cli, state: AppState) -> AppResult<ExitCode> {
    let prompt: Arc<dyn Prompt> = Arc::new(StdinPrompt);
    let report = run_command(cli.command_or_default(), &state, prompt).await?;

    if !report.stdout.is_empty() {
        print!("{}", report.stdout);
    }
    if !report.stderr.is_empty() {
        eprint!("{}", report.stderr);
    }
    Ok(report.exit_code())
}

/// Runs one command and collects its output.
pub async fn run_command(
    command: Commands,
    state: &AppState,
    prompt: Arc<dyn Prompt>,
) -> AppResult<CommandReport> {
    tracing::debug!(?command, "Executing command");

    let queries = QueryCommandHandler::new(state.jobs.clone());
    let actions = ActionCommandHandler::new(state.orchestrator.clone(), state.jobs.clone(), prompt);

    match command {
        Commands::List => Ok(read_report("Failed to load jobs", queries.list().await)),
        Commands::Show { id } => Ok(read_report("Failed to load job", queries.show(&id).await)),
        Commands::Logs { id } => Ok(read_report("Failed to load logs", queries.logs(&id).await)),
        Commands::Create {
            name,
            schedule_type,
            cron,
            interval,
            initial_delay,
            payload,
        } => {
            let args = CreateArgs {
                name,
                schedule_type,
                cron,
                interval,
                initial_delay,
                payload,
            };
            match actions.create(args).await {
                Ok(notification) => Ok(CommandReport::from_notification(&notification)),
                Err(AppError::Validation { errors }) => {
                    let fields: FieldErrors = errors
                        .iter()
                        .map(|e| (e.field.as_str(), e.message.as_str()))
                        .collect();
                    Ok(CommandReport::failure(render::field_errors(&fields)))
                }
                Err(e) => Err(e),
            }
        }
        Commands::Run { id } => action_report(actions.perform(ActionKind::RunNow, &id, true).await),
        Commands::Pause { id, yes } => {
            action_report(actions.perform(ActionKind::Pause, &id, yes).await)
        }
        Commands::Resume { id, yes } => {
            action_report(actions.perform(ActionKind::Resume, &id, yes).await)
        }
        Commands::Delete { id, yes } => {
            action_report(actions.perform(ActionKind::Delete, &id, yes).await)
        }
        Commands::CronPreview { expression } => Ok(CommandReport::output(cron_preview(&expression))),
    }
}

fn read_report(context: &str, result: AppResult<String>) -> CommandReport {
    match result {
        Ok(rendered) => CommandReport::output(rendered),
        Err(e) => {
            tracing::error!(error = %e, "{}", context);
            CommandReport::failure(format!("{}: {}\n", context, e.notification_message()))
        }
    }
}

fn action_report(result: AppResult<Option<Notification>>) -> AppResult<CommandReport> {
    Ok(match result? {
        Some(notification) => CommandReport::from_notification(&notification),
        None => CommandReport::output("Cancelled.\n"),
    })
}

fn cron_preview(expression: &str) -> String {
    match describe_cron(expression) {
        CronPreview::Empty => format!("{}\n", CRON_HINT),
        preview => format!("{}\n{}\n", preview, CRON_HINT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::services::NotificationService;
    use crate::services::notifications::Severity;
    use crate::testing::{FakeJobApi, job};
    use async_trait::async_trait;

    struct Decline;

    #[async_trait]
    impl Prompt for Decline {
        async fn confirm(&self, _question: &str) -> AppResult<bool> {
            Ok(false)
        }
    }

    fn state(api: Arc<FakeJobApi>) -> AppState {
        AppState::from_api(Settings::default(), api, NotificationService::new())
    }

    async fn run(command: Commands, state: &AppState) -> AppResult<CommandReport> {
        run_command(command, state, Arc::new(Decline)).await
    }

    #[tokio::test]
    async fn test_list() {
        let api = Arc::new(FakeJobApi::new());
        api.insert_job(job("1", "nightly", "ACTIVE"));

        let report = run(Commands::List, &state(api)).await.unwrap();
        assert!(report.stdout.contains("nightly"));
        assert!(!report.failed);
    }

    #[tokio::test]
    async fn test_read_failure_is_reported_with_context() {
        let api = Arc::new(FakeJobApi::new());
        api.fail_with(AppError::remote("backend down"));

        let report = run(Commands::List, &state(api.clone())).await.unwrap();
        assert!(report.failed);
        assert_eq!(report.stderr, "Failed to load jobs: backend down\n");

        let report = run(Commands::Logs { id: "1".into() }, &state(api)).await.unwrap();
        assert_eq!(report.stderr, "Failed to load logs: backend down\n");
    }

    #[tokio::test]
    async fn test_run_publishes_notification() {
        let api = Arc::new(FakeJobApi::new());
        api.insert_job(job("1", "nightly", "ACTIVE"));
        let state = state(api.clone());
        let mut rx = state.notifier.subscribe();

        let report = run(Commands::Run { id: "1".into() }, &state).await.unwrap();

        assert!(!report.failed);
        assert!(report.stdout.is_empty());
        assert_eq!(rx.recv().await.unwrap().title, "Job triggered");
        assert_eq!(api.calls("run_job_now"), 1);
    }

    #[tokio::test]
    async fn test_failed_action_sets_failure() {
        let api = Arc::new(FakeJobApi::new());
        api.insert_job(job("1", "nightly", "ACTIVE"));
        let state = state(api.clone());
        state.jobs.job(Some("1")).await.unwrap();
        api.fail_with(AppError::remote("Job is locked"));
        let mut rx = state.notifier.subscribe();

        let report = run(
            Commands::Delete {
                id: "1".into(),
                yes: true,
            },
            &state,
        )
        .await
        .unwrap();

        assert!(report.failed);
        let notification = rx.recv().await.unwrap();
        assert_eq!(notification.severity, Severity::Error);
        assert_eq!(notification.description.as_deref(), Some("Job is locked"));
    }

    #[tokio::test]
    async fn test_declined_delete_prints_cancelled() {
        let api = Arc::new(FakeJobApi::new());
        api.insert_job(job("1", "nightly", "ACTIVE"));

        let report = run(
            Commands::Delete {
                id: "1".into(),
                yes: false,
            },
            &state(api.clone()),
        )
        .await
        .unwrap();

        assert_eq!(report.stdout, "Cancelled.\n");
        assert_eq!(api.calls("delete_job"), 0);
    }

    #[tokio::test]
    async fn test_create_reports_field_errors() {
        let api = Arc::new(FakeJobApi::new());
        let command = Commands::Create {
            name: String::new(),
            schedule_type: "FIXED_RATE".into(),
            cron: None,
            interval: Some("0".into()),
            initial_delay: None,
            payload: None,
        };

        let report = run(command, &state(api.clone())).await.unwrap();

        assert!(report.failed);
        assert!(report.stderr.starts_with("Please fix the following fields:\n"));
        assert!(report.stderr.contains("  name: "));
        assert!(report.stderr.contains("  intervalSeconds: "));
        assert_eq!(api.calls("create_job"), 0);
    }

    #[tokio::test]
    async fn test_unknown_job_is_an_error() {
        let api = Arc::new(FakeJobApi::new());
        let err = run(Commands::Run { id: "9".into() }, &state(api)).await.unwrap_err();
        assert_eq!(err, AppError::rejected("Job '9' not found"));
    }

    #[tokio::test]
    async fn test_cron_preview() {
        let state = state(Arc::new(FakeJobApi::new()));

        let report = run(
            Commands::CronPreview {
                expression: "0/10 * * * * ?".into(),
            },
            &state,
        )
        .await
        .unwrap();
        assert!(report.stdout.starts_with("Quartz cron: seconds=0/10, minutes=*"));
        assert!(report.stdout.ends_with(&format!("{}\n", CRON_HINT)));

        let report = run(
            Commands::CronPreview {
                expression: "   ".into(),
            },
            &state,
        )
        .await
        .unwrap();
        assert_eq!(report.stdout, format!("{}\n", CRON_HINT));
    }
}
