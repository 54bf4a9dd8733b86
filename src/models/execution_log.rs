use serde::{Deserialize, Serialize};

use super::job::{StatusKind, null_as_default};

/// Immutable record of one firing attempt of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLog {
    pub id: String,
    pub job_id: String,
    #[serde(default)]
    pub fire_time: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    /// Only populated for failure-like statuses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ExecutionLog {
    pub fn status_kind(&self) -> StatusKind {
        StatusKind::from_status(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_execution_log_deserializes() {
        let log: ExecutionLog = serde_json::from_value(json!({
            "id": "l1",
            "jobId": "j1",
            "fireTime": "2024-05-01T10:00:00",
            "status": "FAILED",
            "errorMessage": "boom",
            "createdAt": "2024-05-01T10:00:01"
        }))
        .unwrap();

        assert_eq!(log.job_id, "j1");
        assert_eq!(log.error_message.as_deref(), Some("boom"));
        assert_eq!(log.status_kind(), StatusKind::Failed);
    }

    #[test]
    fn test_null_status_reads_as_empty() {
        let logs: Vec<ExecutionLog> = serde_json::from_value(json!([
            {"id": "l1", "jobId": "j1", "status": null, "fireTime": null},
            {"id": "l2", "jobId": "j1", "status": "SUCCESS"},
        ]))
        .unwrap();

        assert!(logs[0].status.is_empty());
        assert_eq!(logs[0].status_kind(), StatusKind::Other);
        assert_eq!(logs[1].status, "SUCCESS");
    }
}
