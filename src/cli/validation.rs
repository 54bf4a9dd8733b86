//! CLI argument validation functions
//!
//! This module provides custom validation functions for CLI arguments
//! that go beyond what clap can validate automatically.

use std::fs;
use std::path::PathBuf;

/// Validate that a file path is accessible (exists and is readable)
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!(
            "Cannot read configuration file '{}': {}",
            path_str, e
        )),
    }
}

/// Validate a job identifier: trimmed, non-empty, no inner whitespace
pub fn validate_job_id(id_str: &str) -> Result<String, String> {
    let id = id_str.trim();

    if id.is_empty() {
        return Err("Job id cannot be empty".to_string());
    }

    if id.chars().any(char::is_whitespace) {
        return Err(format!("Job id cannot contain whitespace, got: '{}'", id));
    }

    Ok(id.to_string())
}
