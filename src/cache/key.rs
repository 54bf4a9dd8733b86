use std::fmt;

/// Identity of one cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The job list, a singleton.
    Jobs,
    /// A single job by id.
    Job(String),
    /// Execution logs of a job.
    Logs(String),
}

impl QueryKey {
    pub fn job(id: impl Into<String>) -> Self {
        QueryKey::Job(id.into())
    }

    pub fn logs(job_id: impl Into<String>) -> Self {
        QueryKey::Logs(job_id.into())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Jobs => f.write_str("jobs"),
            QueryKey::Job(id) => write!(f, "job:{}", id),
            QueryKey::Logs(job_id) => write!(f, "logs:{}", job_id),
        }
    }
}
