use async_trait::async_trait;
use serde_json::json;

use super::documents;
use super::transport::GraphqlClient;
use super::types::{
    CreateJobData, DeleteJobData, JobData, JobLogsData, JobsData, PauseJobData, ResumeJobData,
    RunJobNowData,
};
use crate::error::{AppError, AppResult};
use crate::models::{CreateJobInput, ExecutionLog, Job};
use crate::repositories::JobApi;

/// [`JobApi`] backed by the scheduler's GraphQL endpoint.
#[derive(Clone)]
pub struct GraphqlJobApi {
    client: GraphqlClient,
}

impl GraphqlJobApi {
    pub fn new(client: GraphqlClient) -> Self {
        Self { client }
    }

    fn missing_data(operation: &str) -> AppError {
        AppError::transport(format!("{} response contained no data", operation))
    }
}

#[async_trait]
impl JobApi for GraphqlJobApi {
    async fn list_jobs(&self) -> AppResult<Vec<Job>> {
        let data: Option<JobsData> = self
            .client
            .execute("GetJobs", documents::GET_JOBS, json!({}))
            .await?;
        data.map(|d| d.jobs)
            .ok_or_else(|| Self::missing_data("GetJobs"))
    }

    async fn get_job(&self, id: &str) -> AppResult<Option<Job>> {
        let data: Option<JobData> = self
            .client
            .execute("GetJob", documents::GET_JOB, json!({ "id": id }))
            .await?;
        Ok(data.and_then(|d| d.job))
    }

    async fn create_job(&self, input: &CreateJobInput) -> AppResult<Option<Job>> {
        let data: Option<CreateJobData> = self
            .client
            .execute("CreateJob", documents::CREATE_JOB, json!({ "input": input }))
            .await?;
        Ok(data.and_then(|d| d.create_job))
    }

    async fn run_job_now(&self, id: &str) -> AppResult<Option<bool>> {
        let data: Option<RunJobNowData> = self
            .client
            .execute("RunNow", documents::RUN_JOB_NOW, json!({ "id": id }))
            .await?;
        Ok(data.and_then(|d| d.run_job_now))
    }

    async fn pause_job(&self, id: &str) -> AppResult<Option<Job>> {
        let data: Option<PauseJobData> = self
            .client
            .execute("PauseJob", documents::PAUSE_JOB, json!({ "id": id }))
            .await?;
        Ok(data.and_then(|d| d.pause_job))
    }

    async fn resume_job(&self, id: &str) -> AppResult<Option<Job>> {
        let data: Option<ResumeJobData> = self
            .client
            .execute("ResumeJob", documents::RESUME_JOB, json!({ "id": id }))
            .await?;
        Ok(data.and_then(|d| d.resume_job))
    }

    async fn delete_job(&self, id: &str) -> AppResult<Option<bool>> {
        let data: Option<DeleteJobData> = self
            .client
            .execute("DeleteJob", documents::DELETE_JOB, json!({ "id": id }))
            .await?;
        Ok(data.and_then(|d| d.delete_job))
    }

    async fn job_logs(&self, job_id: &str) -> AppResult<Vec<ExecutionLog>> {
        let data: Option<JobLogsData> = self
            .client
            .execute(
                "Logs",
                documents::GET_EXECUTION_LOGS,
                json!({ "jobId": job_id }),
            )
            .await?;
        data.map(|d| d.job_logs)
            .ok_or_else(|| Self::missing_data("Logs"))
    }
}
