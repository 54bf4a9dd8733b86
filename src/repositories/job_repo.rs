use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::models::{CreateJobInput, ExecutionLog, Job};

/// Raw backend contract, one method per remote operation.
///
/// Results are exactly what the wire can carry: mutations that return an
/// entity or a flag may return nothing at all.
#[async_trait]
pub trait JobApi: Send + Sync {
    async fn list_jobs(&self) -> AppResult<Vec<Job>>;
    async fn get_job(&self, id: &str) -> AppResult<Option<Job>>;
    async fn create_job(&self, input: &CreateJobInput) -> AppResult<Option<Job>>;
    async fn run_job_now(&self, id: &str) -> AppResult<Option<bool>>;
    async fn pause_job(&self, id: &str) -> AppResult<Option<Job>>;
    async fn resume_job(&self, id: &str) -> AppResult<Option<Job>>;
    async fn delete_job(&self, id: &str) -> AppResult<Option<bool>>;
    async fn job_logs(&self, job_id: &str) -> AppResult<Vec<ExecutionLog>>;
}

/// Typed access to the job operations of the backend.
///
/// Each call is a single round trip without retries or caching.
#[derive(Clone)]
pub struct JobRepository {
    api: Arc<dyn JobApi>,
}

impl JobRepository {
    pub fn new(api: Arc<dyn JobApi>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> AppResult<Vec<Job>> {
        tracing::debug!("Listing jobs");
        self.api.list_jobs().await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Option<Job>> {
        tracing::debug!(job_id = %id, "Fetching job");
        self.api.get_job(id).await
    }

    /// Fails with [`AppError::EmptyResult`] when the backend returns no job.
    pub async fn create(&self, input: &CreateJobInput) -> AppResult<Job> {
        tracing::debug!(name = %input.name(), schedule_type = %input.schedule_type(), "Creating job");
        self.api
            .create_job(input)
            .await?
            .ok_or_else(|| AppError::empty_result("Failed to create job"))
    }

    /// An absent flag counts as `false`.
    pub async fn run_now(&self, id: &str) -> AppResult<bool> {
        tracing::debug!(job_id = %id, "Triggering job");
        Ok(self.api.run_job_now(id).await?.unwrap_or(false))
    }

    pub async fn pause(&self, id: &str) -> AppResult<Job> {
        tracing::debug!(job_id = %id, "Pausing job");
        self.api
            .pause_job(id)
            .await?
            .ok_or_else(|| AppError::empty_result("Failed to pause job"))
    }

    pub async fn resume(&self, id: &str) -> AppResult<Job> {
        tracing::debug!(job_id = %id, "Resuming job");
        self.api
            .resume_job(id)
            .await?
            .ok_or_else(|| AppError::empty_result("Failed to resume job"))
    }

    /// An absent flag counts as `false`.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        tracing::debug!(job_id = %id, "Deleting job");
        Ok(self.api.delete_job(id).await?.unwrap_or(false))
    }

    pub async fn execution_logs(&self, job_id: &str) -> AppResult<Vec<ExecutionLog>> {
        tracing::debug!(job_id = %job_id, "Fetching execution logs");
        self.api.job_logs(job_id).await
    }
}
