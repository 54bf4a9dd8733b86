//! In-memory backend used by unit tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::{AppError, AppResult};
use crate::models::{CreateJobInput, ExecutionLog, Job};
use crate::repositories::JobApi;

pub fn job(id: &str, name: &str, status: &str) -> Job {
    Job {
        id: id.to_string(),
        name: name.to_string(),
        schedule_type: None,
        cron_expression: None,
        interval_seconds: None,
        initial_delay_seconds: None,
        payload: None,
        status: status.to_string(),
        version: Some(0),
        created_at: None,
        updated_at: None,
    }
}

pub fn log(id: &str, job_id: &str, status: &str) -> ExecutionLog {
    ExecutionLog {
        id: id.to_string(),
        job_id: job_id.to_string(),
        fire_time: None,
        status: status.to_string(),
        error_message: None,
        created_at: None,
    }
}

/// Behaves like a well-mannered backend unless told otherwise, and counts
/// every call per operation.
#[derive(Default)]
pub struct FakeJobApi {
    jobs: Mutex<BTreeMap<String, Job>>,
    logs: Mutex<HashMap<String, Vec<ExecutionLog>>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    failure: Mutex<Option<AppError>>,
    create_override: Mutex<Option<Option<Job>>>,
    pause_override: Mutex<Option<Option<Job>>>,
    resume_override: Mutex<Option<Option<Job>>>,
    flag_override: Mutex<Option<Option<bool>>>,
    next_id: AtomicU64,
    held: AtomicBool,
    gate: Notify,
}

impl FakeJobApi {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(100),
            ..Default::default()
        }
    }

    pub fn insert_job(&self, job: Job) {
        self.jobs.lock().unwrap().insert(job.id.clone(), job);
    }

    pub fn insert_log(&self, log: ExecutionLog) {
        self.logs
            .lock()
            .unwrap()
            .entry(log.job_id.clone())
            .or_default()
            .push(log);
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    /// Every subsequent call fails with `error`.
    pub fn fail_with(&self, error: AppError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn clear_failure(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn set_create_result(&self, result: Option<Job>) {
        *self.create_override.lock().unwrap() = Some(result);
    }

    pub fn set_pause_result(&self, result: Option<Job>) {
        *self.pause_override.lock().unwrap() = Some(result);
    }

    pub fn set_resume_result(&self, result: Option<Job>) {
        *self.resume_override.lock().unwrap() = Some(result);
    }

    /// Overrides the flag returned by both `runJobNow` and `deleteJob`.
    pub fn set_flag_result(&self, result: Option<bool>) {
        *self.flag_override.lock().unwrap() = Some(result);
    }

    /// Blocks every subsequent call until [`release`](Self::release).
    pub fn hold(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.held.store(false, Ordering::SeqCst);
        self.gate.notify_waiters();
    }

    /// Records the call, yields once so concurrent callers can interleave,
    /// waits while held, then reports the configured failure if any.
    async fn enter(&self, operation: &'static str) -> AppResult<()> {
        *self.calls.lock().unwrap().entry(operation).or_insert(0) += 1;
        tokio::task::yield_now().await;
        while self.held.load(Ordering::SeqCst) {
            let notified = self.gate.notified();
            if !self.held.load(Ordering::SeqCst) {
                break;
            }
            notified.await;
        }
        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn set_status(&self, id: &str, status: &str) -> Option<Job> {
        let mut jobs = self.jobs.lock().unwrap();
        let stored = jobs.get_mut(id)?;
        stored.status = status.to_string();
        stored.version = stored.version.map(|v| v + 1);
        // mutation selections only carry id and status
        Some(job(&stored.id, "", &stored.status))
    }
}

#[async_trait]
impl JobApi for FakeJobApi {
    async fn list_jobs(&self) -> AppResult<Vec<Job>> {
        self.enter("list_jobs").await?;
        Ok(self.jobs.lock().unwrap().values().cloned().collect())
    }

    async fn get_job(&self, id: &str) -> AppResult<Option<Job>> {
        self.enter("get_job").await?;
        Ok(self.jobs.lock().unwrap().get(id).cloned())
    }

    async fn create_job(&self, input: &CreateJobInput) -> AppResult<Option<Job>> {
        self.enter("create_job").await?;
        if let Some(result) = self.create_override.lock().unwrap().clone() {
            return Ok(result);
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        let mut created = job(&id, input.name(), "ACTIVE");
        created.schedule_type = Some(input.schedule_type());
        created.cron_expression = input.cron_expression().map(str::to_string);
        created.interval_seconds = input.interval_seconds().map(|v| v as i64);
        created.initial_delay_seconds = input.initial_delay_seconds().map(|v| v as i64);
        created.payload = input.payload().cloned();
        self.insert_job(created.clone());
        Ok(Some(created))
    }

    async fn run_job_now(&self, id: &str) -> AppResult<Option<bool>> {
        self.enter("run_job_now").await?;
        if let Some(result) = *self.flag_override.lock().unwrap() {
            return Ok(result);
        }
        Ok(Some(self.jobs.lock().unwrap().contains_key(id)))
    }

    async fn pause_job(&self, id: &str) -> AppResult<Option<Job>> {
        self.enter("pause_job").await?;
        if let Some(result) = self.pause_override.lock().unwrap().clone() {
            return Ok(result);
        }
        Ok(self.set_status(id, "PAUSED"))
    }

    async fn resume_job(&self, id: &str) -> AppResult<Option<Job>> {
        self.enter("resume_job").await?;
        if let Some(result) = self.resume_override.lock().unwrap().clone() {
            return Ok(result);
        }
        Ok(self.set_status(id, "ACTIVE"))
    }

    async fn delete_job(&self, id: &str) -> AppResult<Option<bool>> {
        self.enter("delete_job").await?;
        if let Some(result) = *self.flag_override.lock().unwrap() {
            return Ok(result);
        }
        self.logs.lock().unwrap().remove(id);
        Ok(Some(self.jobs.lock().unwrap().remove(id).is_some()))
    }

    async fn job_logs(&self, job_id: &str) -> AppResult<Vec<ExecutionLog>> {
        self.enter("job_logs").await?;
        Ok(self
            .logs
            .lock()
            .unwrap()
            .get(job_id)
            .cloned()
            .unwrap_or_default())
    }
}
