use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::models::{ExecutionLog, Job};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest<'a> {
    pub query: &'a str,
    pub operation_name: &'a str,
    pub variables: JsonValue,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlError {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct JobsData {
    #[serde(default)]
    pub jobs: Vec<Job>,
}

#[derive(Debug, Deserialize)]
pub struct JobData {
    #[serde(default)]
    pub job: Option<Job>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobLogsData {
    #[serde(default)]
    pub job_logs: Vec<ExecutionLog>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobData {
    #[serde(default)]
    pub create_job: Option<Job>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunJobNowData {
    #[serde(default)]
    pub run_job_now: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseJobData {
    #[serde(default)]
    pub pause_job: Option<Job>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeJobData {
    #[serde(default)]
    pub resume_job: Option<Job>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteJobData {
    #[serde(default)]
    pub delete_job: Option<bool>,
}
