//! Repository layer over the scheduler backend.

mod job_repo;

pub use job_repo::{JobApi, JobRepository};
