use std::process::ExitCode;
use std::sync::Arc;

use cadence_rs::AppState;
use cadence_rs::cli::{self, Cli, ConsoleNotifier};
use cadence_rs::services::NotificationService;
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match cli::load_and_merge_config(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = cli::init_logger_from_settings(&settings) {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    tracing::debug!(
        version = cadence_rs::pkg_version(),
        endpoint = %settings.backend.endpoint,
        "Starting cadence"
    );

    let notifications = NotificationService::new().with_sink(Arc::new(ConsoleNotifier));
    let state = match AppState::with_notifications(settings, notifications) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli::execute_command(&cli, state).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {}", e.notification_message());
            ExitCode::FAILURE
        }
    }
}
