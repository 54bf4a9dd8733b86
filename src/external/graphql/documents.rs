//! Operation documents sent to the scheduler backend.
//!
//! Selections mirror what each screen needs: the list and the mutations
//! return partial jobs, only `job(id)` selects every field.

pub const GET_JOBS: &str = r#"
query GetJobs {
  jobs {
    id
    name
    scheduleType
    status
    createdAt
    updatedAt
  }
}
"#;

pub const GET_JOB: &str = r#"
query GetJob($id: ID!) {
  job(id: $id) {
    id
    name
    scheduleType
    cronExpression
    intervalSeconds
    initialDelaySeconds
    payload
    status
    version
    createdAt
    updatedAt
  }
}
"#;

pub const GET_EXECUTION_LOGS: &str = r#"
query Logs($jobId: ID!) {
  jobLogs(jobId: $jobId) {
    id
    jobId
    fireTime
    status
    errorMessage
    createdAt
  }
}
"#;

pub const CREATE_JOB: &str = r#"
mutation CreateJob($input: CreateJobInput!) {
  createJob(input: $input) {
    id
    name
    scheduleType
    status
  }
}
"#;

pub const RUN_JOB_NOW: &str = r#"
mutation RunNow($id: ID!) {
  runJobNow(id: $id)
}
"#;

pub const PAUSE_JOB: &str = r#"
mutation PauseJob($id: ID!) {
  pauseJob(id: $id) {
    id
    status
  }
}
"#;

pub const RESUME_JOB: &str = r#"
mutation ResumeJob($id: ID!) {
  resumeJob(id: $id) {
    id
    status
  }
}
"#;

pub const DELETE_JOB: &str = r#"
mutation DeleteJob($id: ID!) {
  deleteJob(id: $id)
}
"#;
