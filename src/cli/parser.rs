//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Operator console for the distributed job scheduler
#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(about = "Operator console for the distributed job scheduler")]
#[command(long_about = "
Cadence talks to a scheduler instance over GraphQL. It lists jobs and their
execution logs, creates new jobs, and runs, pauses, resumes or deletes
existing ones. Pause, resume and delete ask for confirmation first.

EXAMPLES:
    # List all jobs (default command)
    cadence

    # Show one job and its recent executions
    cadence show 42
    cadence logs 42

    # Create a cron job and a fixed-rate job
    cadence create --name nightly-report --cron '0 0 2 * * ?'
    cadence create --name heartbeat --schedule-type FIXED_RATE --interval 30 \\
        --payload '{\"target\": \"billing\"}'

    # Trigger, pause and delete without prompting
    cadence run 42
    cadence pause 42 --yes
    cadence delete 42 --yes

    # Explain a cron expression
    cadence cron-preview '0/10 * * * * ?'

    # Use a specific configuration file and verbose logging
    cadence --config /etc/cadence/production.toml --verbose list
")]
#[command(version = crate::build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute (defaults to `list`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load a single TOML file instead of the layered `config/` directory.
    /// The file must exist and be readable.
    ///
    /// Example: --config /etc/cadence/production.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` overlay is loaded.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    ///
    /// Raises log output to debug level, including every backend call.
    /// Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Lowers log output to error level only.
    /// Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List all jobs with their schedule type and status
    List,

    /// Show every field of one job
    Show {
        /// Job identifier
        #[arg(value_parser = super::validation::validate_job_id)]
        id: String,
    },

    /// Show the execution logs of one job
    Logs {
        /// Job identifier
        #[arg(value_parser = super::validation::validate_job_id)]
        id: String,
    },

    /// Create a new job
    ///
    /// Values are checked the same way the create form checks them; every
    /// failing field is reported before anything is sent.
    ///
    /// Examples:
    ///   cadence create --name nightly --cron '0 0 2 * * ?'
    ///   cadence create --name poll --schedule-type FIXED_DELAY --interval 60 --initial-delay 5
    Create {
        /// Job name
        #[arg(long)]
        name: String,

        /// Schedule type: CRON, FIXED_RATE or FIXED_DELAY
        #[arg(long, value_name = "TYPE", default_value = "CRON")]
        schedule_type: String,

        /// Quartz cron expression (CRON jobs)
        #[arg(long, value_name = "EXPRESSION")]
        cron: Option<String>,

        /// Interval in whole seconds (FIXED_RATE and FIXED_DELAY jobs)
        #[arg(long, value_name = "SECONDS")]
        interval: Option<String>,

        /// Initial delay in whole seconds (FIXED_RATE and FIXED_DELAY jobs)
        #[arg(long, value_name = "SECONDS")]
        initial_delay: Option<String>,

        /// JSON payload handed to the job on every execution
        #[arg(long, value_name = "JSON")]
        payload: Option<String>,
    },

    /// Trigger an immediate execution
    Run {
        /// Job identifier
        #[arg(value_parser = super::validation::validate_job_id)]
        id: String,
    },

    /// Pause a job
    Pause {
        /// Job identifier
        #[arg(value_parser = super::validation::validate_job_id)]
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Resume a paused job
    Resume {
        /// Job identifier
        #[arg(value_parser = super::validation::validate_job_id)]
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete a job and its execution logs
    Delete {
        /// Job identifier
        #[arg(value_parser = super::validation::validate_job_id)]
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Explain a cron expression field by field
    CronPreview {
        /// Quartz cron expression
        expression: String,
    },
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

impl Cli {
    /// Command to run, `list` when none was given
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::List)
    }

    /// Log level forced by `--verbose` or `--quiet`
    pub fn log_level_override(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_flag() {
        let err = Cli::try_parse_from(["cadence", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["cadence", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_default_command_is_list() {
        let cli = Cli::try_parse_from(["cadence"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.command_or_default(), Commands::List);
        assert!(cli.config.is_none());
        assert!(cli.env.is_none());
        assert_eq!(cli.log_level_override(), None);
    }

    #[test]
    fn test_create_command() {
        let cli = Cli::try_parse_from([
            "cadence",
            "create",
            "--name",
            "heartbeat",
            "--schedule-type",
            "FIXED_RATE",
            "--interval",
            "30",
            "--payload",
            "{\"a\":1}",
        ])
        .unwrap();

        match cli.command_or_default() {
            Commands::Create {
                name,
                schedule_type,
                cron,
                interval,
                initial_delay,
                payload,
            } => {
                assert_eq!(name, "heartbeat");
                assert_eq!(schedule_type, "FIXED_RATE");
                assert!(cron.is_none());
                assert_eq!(interval.as_deref(), Some("30"));
                assert!(initial_delay.is_none());
                assert_eq!(payload.as_deref(), Some("{\"a\":1}"));
            }
            other => panic!("Expected Create command, got {other:?}"),
        }
    }

    #[test]
    fn test_create_defaults_to_cron() {
        let cli =
            Cli::try_parse_from(["cadence", "create", "--name", "n", "--cron", "0 * * * * ?"])
                .unwrap();
        assert!(matches!(
            cli.command_or_default(),
            Commands::Create { schedule_type, .. } if schedule_type == "CRON"
        ));
    }

    #[test]
    fn test_delete_with_yes() {
        let cli = Cli::try_parse_from(["cadence", "delete", "42", "--yes"]).unwrap();
        assert_eq!(
            cli.command_or_default(),
            Commands::Delete {
                id: "42".to_string(),
                yes: true
            }
        );
    }

    #[test]
    fn test_blank_job_id_rejected() {
        let err = Cli::try_parse_from(["cadence", "run", "  "]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cron_preview_command() {
        let cli = Cli::try_parse_from(["cadence", "cron-preview", "0/10 * * * * ?"]).unwrap();
        assert_eq!(
            cli.command_or_default(),
            Commands::CronPreview {
                expression: "0/10 * * * * ?".to_string()
            }
        );
    }

    #[test]
    fn test_environment_aliases() {
        let cli = Cli::try_parse_from(["cadence", "--env", "prod"]).unwrap();
        assert_eq!(cli.env, Some(Environment::Production));
        assert_eq!(
            crate::config::Environment::from(Environment::Staging),
            crate::config::Environment::Staging
        );
    }

    #[test]
    fn test_verbose_and_quiet_levels() {
        let cli = Cli::try_parse_from(["cadence", "-v"]).unwrap();
        assert_eq!(cli.log_level_override(), Some("debug"));

        let cli = Cli::try_parse_from(["cadence", "--quiet"]).unwrap();
        assert_eq!(cli.log_level_override(), Some("error"));
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let err = Cli::try_parse_from(["cadence", "--verbose", "--quiet"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
