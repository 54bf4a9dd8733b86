//! Entities exchanged with the scheduler backend.

mod execution_log;
mod job;

pub use execution_log::ExecutionLog;
pub use job::{CreateJobInput, Job, ScheduleType, StatusKind};
