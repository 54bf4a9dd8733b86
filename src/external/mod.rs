//! Clients for services outside this process.

pub mod client;
pub mod graphql;

pub use client::build_http_client;
pub use graphql::{GraphqlClient, GraphqlJobApi};
