use std::time::Duration;

use crate::config::BackendConfig;
use crate::error::{AppError, AppResult};

/// Builds the HTTP client shared by every backend call.
///
/// One client is created per [`crate::state::AppState`] so connections are
/// pooled across requests. Timeouts and the User-Agent come from
/// [`BackendConfig`].
pub fn build_http_client(config: &BackendConfig) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        // Timeouts
        .timeout(config.request_timeout())
        .connect_timeout(config.connect_timeout())
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        // Enable compression (gzip, deflate, brotli, zstd)
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .zstd(true)
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| AppError::Configuration {
            key: "backend".to_string(),
            message: format!("Failed to build HTTP client: {}", e),
        })
}
