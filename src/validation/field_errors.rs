use std::collections::BTreeMap;

use validator::ValidationErrors;

use crate::error::{AppError, ValidationFieldError};

/// One human-readable message per draft field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_field_errors(self) -> Vec<ValidationFieldError> {
        self.0
            .into_iter()
            .map(|(field, message)| ValidationFieldError { field, message })
            .collect()
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, list) in errors.field_errors() {
            // last rule that fired for a field wins
            if let Some(message) = list.iter().rev().find_map(|e| e.message.as_ref()) {
                out.insert(field.to_string(), message.to_string());
            }
        }
        out
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation {
            errors: errors.into_field_errors(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut out = FieldErrors::new();
        for (field, message) in iter {
            out.insert(field, message);
        }
        out
    }
}
