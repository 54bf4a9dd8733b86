//! Read-only commands: list, show and logs.

use crate::cli::render;
use crate::error::AppResult;
use crate::services::JobService;

/// Renders cached backend reads for the terminal.
pub struct QueryCommandHandler {
    jobs: JobService,
}

impl QueryCommandHandler {
    pub fn new(jobs: JobService) -> Self {
        Self { jobs }
    }

    pub async fn list(&self) -> AppResult<String> {
        let jobs = self.jobs.jobs().await?;
        tracing::debug!(count = jobs.len(), "Listing jobs");
        Ok(render::jobs_table(&jobs))
    }

    pub async fn show(&self, id: &str) -> AppResult<String> {
        let job = self.jobs.job(Some(id)).await?;
        Ok(render::job_details(job.as_deref()))
    }

    /// The job is fetched alongside its logs only for the header; a failed
    /// job read falls back to the unknown-job header.
    pub async fn logs(&self, id: &str) -> AppResult<String> {
        let (job, logs) = tokio::join!(
            self.jobs.job(Some(id)),
            self.jobs.execution_logs(Some(id))
        );
        let logs = logs?;
        let job = job.ok().flatten();
        Ok(render::logs_table(job.as_deref(), &logs))
    }
}
