//! Terminal collaborators: the notification sink that prints outcomes and
//! the yes/no prompt behind confirmations.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::render::notification_line;
use crate::error::{AppError, AppResult};
use crate::services::notifications::{Notification, NotificationSink};

/// Prints every notification: successes to stdout, failures to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

#[async_trait]
impl NotificationSink for ConsoleNotifier {
    async fn notify(&self, notification: &Notification) -> AppResult<()> {
        let line = notification_line(notification);
        if notification.is_error() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

/// Asks the operator a yes/no question.
#[async_trait]
pub trait Prompt: Send + Sync {
    async fn confirm(&self, question: &str) -> AppResult<bool>;
}

/// Reads the answer from stdin. Only `y` and `yes` (any case) confirm;
/// an empty line or end of input declines.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

pub(crate) fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl Prompt for StdinPrompt {
    async fn confirm(&self, question: &str) -> AppResult<bool> {
        let io_error = |e: std::io::Error| AppError::rejected(format!("no confirmation: {}", e));

        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("{} [y/N] ", question).as_bytes())
            .await
            .map_err(io_error)?;
        stdout.flush().await.map_err(io_error)?;

        let mut answer = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut answer)
            .await
            .map_err(io_error)?;

        Ok(is_affirmative(&answer))
    }
}
