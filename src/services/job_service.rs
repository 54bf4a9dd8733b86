//! Job service: cached reads and cache-invalidating mutations.

use std::sync::Arc;

use crate::cache::{QueryCache, QueryKey, QuerySnapshot};
use crate::error::{AppError, AppResult};
use crate::models::{CreateJobInput, ExecutionLog, Job};
use crate::repositories::JobRepository;

/// Value stored under a [`QueryKey`]. The variant always matches the key.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Jobs(Arc<Vec<Job>>),
    Job(Option<Arc<Job>>),
    Logs(Arc<Vec<ExecutionLog>>),
}

fn mismatch(key: &QueryKey) -> AppError {
    AppError::Parse {
        message: format!("Cache entry '{}' holds a value of another kind", key),
    }
}

/// Job service wrapping the repository with the query cache.
///
/// Reads go through the cache. Mutations call the repository and, only
/// after a successful response, invalidate the keys whose server state
/// they changed.
#[derive(Clone)]
pub struct JobService {
    repo: JobRepository,
    cache: QueryCache<QueryValue>,
}

impl JobService {
    pub fn new(repo: JobRepository, cache: QueryCache<QueryValue>) -> Self {
        Self { repo, cache }
    }

    pub fn cache(&self) -> &QueryCache<QueryValue> {
        &self.cache
    }

    pub fn snapshot(&self, key: &QueryKey) -> Option<QuerySnapshot<QueryValue>> {
        self.cache.snapshot(key)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Lists all jobs (`jobs` key).
    pub async fn jobs(&self) -> AppResult<Arc<Vec<Job>>> {
        let repo = self.repo.clone();
        let value = self
            .cache
            .fetch(QueryKey::Jobs, move || async move {
                repo.list().await.map(|jobs| QueryValue::Jobs(Arc::new(jobs)))
            })
            .await?;

        match value {
            QueryValue::Jobs(jobs) => Ok(jobs),
            _ => Err(mismatch(&QueryKey::Jobs)),
        }
    }

    /// Gets a job by id (`job:{id}` key). Without an id the read is
    /// disabled and resolves to `None` without touching the backend.
    pub async fn job(&self, id: Option<&str>) -> AppResult<Option<Arc<Job>>> {
        let Some(id) = id else {
            return Ok(None);
        };

        let key = QueryKey::job(id);
        let repo = self.repo.clone();
        let id = id.to_string();
        let value = self
            .cache
            .fetch(key.clone(), move || async move {
                repo.get_by_id(&id)
                    .await
                    .map(|job| QueryValue::Job(job.map(Arc::new)))
            })
            .await?;

        match value {
            QueryValue::Job(job) => Ok(job),
            _ => Err(mismatch(&key)),
        }
    }

    /// Execution logs of a job (`logs:{jobId}` key). Without a job id the
    /// read is disabled and resolves to an empty list.
    pub async fn execution_logs(&self, job_id: Option<&str>) -> AppResult<Arc<Vec<ExecutionLog>>> {
        let Some(job_id) = job_id else {
            return Ok(Arc::new(Vec::new()));
        };

        let key = QueryKey::logs(job_id);
        let repo = self.repo.clone();
        let job_id = job_id.to_string();
        let value = self
            .cache
            .fetch(key.clone(), move || async move {
                repo.execution_logs(&job_id)
                    .await
                    .map(|logs| QueryValue::Logs(Arc::new(logs)))
            })
            .await?;

        match value {
            QueryValue::Logs(logs) => Ok(logs),
            _ => Err(mismatch(&key)),
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub async fn create_job(&self, input: &CreateJobInput) -> AppResult<Job> {
        let job = self.repo.create(input).await?;
        self.cache.invalidate(&QueryKey::Jobs);
        Ok(job)
    }

    /// Triggers an immediate run. A new execution log is expected, so the
    /// job's logs are invalidated too.
    pub async fn run_now(&self, id: &str) -> AppResult<bool> {
        let triggered = self.repo.run_now(id).await?;
        self.cache.invalidate(&QueryKey::Jobs);
        self.cache.invalidate(&QueryKey::logs(id));
        Ok(triggered)
    }

    pub async fn pause(&self, id: &str) -> AppResult<Job> {
        let job = self.repo.pause(id).await?;
        self.cache.invalidate(&QueryKey::Jobs);
        self.cache.invalidate(&QueryKey::job(id));
        Ok(job)
    }

    pub async fn resume(&self, id: &str) -> AppResult<Job> {
        let job = self.repo.resume(id).await?;
        self.cache.invalidate(&QueryKey::Jobs);
        self.cache.invalidate(&QueryKey::job(id));
        Ok(job)
    }

    /// Deletes a job and evicts everything cached for it.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let deleted = self.repo.delete(id).await?;
        self.cache.invalidate(&QueryKey::Jobs);
        self.cache.remove(&QueryKey::job(id));
        self.cache.remove(&QueryKey::logs(id));
        Ok(deleted)
    }
}
