use serde_json::Value as JsonValue;

use crate::error::AppError;

/// Text buffer for the optional JSON payload of a job.
///
/// The value only advances when the text parses; otherwise the previous
/// valid document is retained and the parse failure is reported alongside.
#[derive(Debug, Clone, Default)]
pub struct PayloadEditor {
    text: String,
    value: Option<JsonValue>,
    error: Option<AppError>,
}

impl PayloadEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing document, pretty-printed.
    pub fn with_value(value: Option<JsonValue>) -> Self {
        let text = value
            .as_ref()
            .and_then(|v| serde_json::to_string_pretty(v).ok())
            .unwrap_or_default();
        Self {
            text,
            value,
            error: None,
        }
    }

    /// Replaces the text. Blank text clears the payload.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        if self.text.trim().is_empty() {
            self.value = None;
            self.error = None;
            return;
        }
        match serde_json::from_str::<JsonValue>(&self.text) {
            Ok(value) => {
                self.value = Some(value);
                self.error = None;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Payload text is not valid JSON, keeping last value");
                self.error = Some(AppError::from(e));
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Last successfully parsed document.
    pub fn value(&self) -> Option<&JsonValue> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<JsonValue> {
        self.value
    }

    /// Parse failure of the current text, if any.
    pub fn error(&self) -> Option<&AppError> {
        self.error.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}
