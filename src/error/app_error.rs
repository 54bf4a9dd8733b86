use std::fmt;

use thiserror::Error;

/// A single field-scoped validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFieldError {
    pub field: String,
    pub message: String,
}

impl ValidationFieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Application-wide error type.
///
/// Every variant carries owned text only, so the type is `Clone` and a single
/// failed fetch can be handed to every caller that joined it in the query cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Local pre-flight validation failed; nothing was sent to the backend.
    #[error("Validation failed: {}", format_field_errors(.errors))]
    Validation { errors: Vec<ValidationFieldError> },

    /// A structured document (job payload) could not be parsed.
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// The backend rejected the operation and supplied a message.
    #[error("{message}")]
    Remote { message: String },

    /// The backend accepted a mutation but returned no entity.
    #[error("{message}")]
    EmptyResult { message: String },

    /// The request never produced a backend answer (network, HTTP status, decoding).
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// A user action was requested in a phase that does not allow it.
    #[error("Action rejected: {reason}")]
    ActionRejected { reason: String },

    /// Configuration error with key information
    #[error("Configuration error: {key}: {message}")]
    Configuration { key: String, message: String },
}

impl AppError {
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }

    pub fn empty_result(message: impl Into<String>) -> Self {
        Self::EmptyResult {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::ActionRejected {
            reason: reason.into(),
        }
    }

    /// Text shown to the operator when an action fails.
    ///
    /// Remote and empty-result errors are surfaced verbatim; everything else
    /// falls back to the `Display` rendering.
    pub fn notification_message(&self) -> String {
        match self {
            AppError::Remote { message } | AppError::EmptyResult { message } => {
                if message.trim().is_empty() {
                    "Unknown error".to_string()
                } else {
                    message.clone()
                }
            }
            other => other.to_string(),
        }
    }
}

fn format_field_errors(errors: &[ValidationFieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::Parse {
            message: error.to_string(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
