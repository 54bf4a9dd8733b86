mod documents;
mod job_api;
mod transport;
mod types;

pub use job_api::GraphqlJobApi;
pub use transport::GraphqlClient;
