//! Configuration validation
//!
//! Each configuration section validates itself; `Settings::validate`
//! reports the first failing field.

use crate::config::error::ConfigError;
use crate::config::settings::{BackendConfig, CacheConfig, FileSettings, LoggerSettings, Settings};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl BackendConfig {
    /// Validate backend configuration
    ///
    /// # Validation Rules
    /// - Endpoint must not be empty and must use http or https
    /// - Both timeouts must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(ConfigError::validation(
                "backend.endpoint",
                "Endpoint cannot be empty",
            ));
        }

        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::ValidationError {
                field: "backend.endpoint".to_string(),
                message: format!("Endpoint '{}' must be an http or https URL", endpoint),
            });
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "backend.request_timeout",
                "Request timeout must be greater than 0",
            ));
        }

        if self.connect_timeout == 0 {
            return Err(ConfigError::validation(
                "backend.connect_timeout",
                "Connect timeout must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl CacheConfig {
    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_capacity == 0 {
            return Err(ConfigError::validation(
                "cache.event_capacity",
                "Event capacity must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl FileSettings {
    /// Validate file logging settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path cannot be empty when file logging is enabled",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        self.file.validate()?;

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// This method validates all sub-configurations and returns the first
    /// validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.backend.validate()?;
        self.cache.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}
