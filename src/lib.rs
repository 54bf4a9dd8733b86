//! Cadence Library
//!
//! Operator console for a distributed job scheduler: a GraphQL client,
//! a deduplicating query cache and the action workflow on top of it.

use shadow_rs::shadow;
shadow!(build);

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod validation;

#[cfg(test)]
mod testing;

pub use state::AppState;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
