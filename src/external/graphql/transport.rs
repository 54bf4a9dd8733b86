use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use super::types::{GraphqlError, GraphqlRequest, GraphqlResponse};
use crate::error::{AppError, AppResult};

/// Minimal GraphQL-over-HTTP client: one POST per operation, no retries.
#[derive(Clone)]
pub struct GraphqlClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GraphqlClient {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Executes one operation and returns its `data` member.
    ///
    /// A response carrying `errors` fails with [`AppError::Remote`] even when
    /// partial data is present. Network, HTTP status and decoding failures
    /// fail with [`AppError::Transport`].
    pub async fn execute<T: DeserializeOwned>(
        &self,
        operation_name: &str,
        query: &str,
        variables: JsonValue,
    ) -> AppResult<Option<T>> {
        let request = GraphqlRequest {
            query,
            operation_name,
            variables,
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e: reqwest::Error| {
                AppError::transport(format!("{} request failed: {}", operation_name, e))
            })?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(|e: reqwest::Error| {
            AppError::transport(format!("{} failed reading body: {}", operation_name, e))
        })?;

        let parsed = serde_json::from_slice::<GraphqlResponse<T>>(&body);

        if !status.is_success() {
            // GraphQL servers may report errors with a non-2xx status
            if let Ok(response) = &parsed {
                if !response.errors.is_empty() {
                    return Err(AppError::remote(join_messages(&response.errors)));
                }
            }
            return Err(AppError::transport(format!(
                "{} HTTP error: {}",
                operation_name, status
            )));
        }

        let response = parsed.map_err(|e| {
            AppError::transport(format!("{} invalid JSON: {}", operation_name, e))
        })?;

        if !response.errors.is_empty() {
            return Err(AppError::remote(join_messages(&response.errors)));
        }

        Ok(response.data)
    }
}

fn join_messages(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.trim())
        .filter(|m| !m.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}
