//! Configuration merger for CLI arguments and config files
//!
//! This module handles merging CLI argument overrides with file-based configuration,
//! implementing the configuration precedence logic.

use super::parser::Cli;
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};

/// Configuration merger that applies CLI overrides on top of loaded settings
///
/// CLI arguments take precedence over every file and environment variable.
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    /// Create a new configuration merger with base configuration
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the base configuration the way the CLI asks for it
    ///
    /// `--config` switches to single-file loading and `--env` replaces the
    /// environment read from `CADENCE_APP_ENV`.
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;

        if let Some(path) = &cli.config {
            loader = loader.with_config_file(path.clone());
        }
        if let Some(env) = cli.env {
            loader = loader.with_environment(env.into());
        }

        Ok(Self::new(loader.load()?))
    }

    /// Merge CLI argument overrides into the base configuration
    ///
    /// # Errors
    /// Returns ConfigError if the merged configuration fails validation
    pub fn merge_cli_args(self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config;

        if let Some(level) = cli.log_level_override() {
            config.logger.level = level.to_string();
        }

        config.validate()?;
        Ok(config)
    }
}
