//! Command handlers for CLI operations
//!
//! This module contains handlers for different CLI commands,
//! separating command execution logic from parsing and rendering.

pub mod action;
pub mod query;

pub use action::{ActionCommandHandler, CreateArgs};
pub use query::QueryCommandHandler;
