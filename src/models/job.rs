//! Job and job-creation models as exchanged with the scheduler backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::error::AppError;

/// Firing strategy of a job. Chosen at creation and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleType {
    Cron,
    FixedRate,
    FixedDelay,
}

impl ScheduleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleType::Cron => "CRON",
            ScheduleType::FixedRate => "FIXED_RATE",
            ScheduleType::FixedDelay => "FIXED_DELAY",
        }
    }
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CRON" => Ok(ScheduleType::Cron),
            "FIXED_RATE" => Ok(ScheduleType::FixedRate),
            "FIXED_DELAY" => Ok(ScheduleType::FixedDelay),
            _ => Err(AppError::Parse {
                message: format!(
                    "Invalid schedule type '{}'. Valid values are: CRON, FIXED_RATE, FIXED_DELAY",
                    s
                ),
            }),
        }
    }
}

/// Unknown schedule type names read from the backend are ignored instead of
/// failing the whole response.
fn lenient_schedule_type<'de, D>(deserializer: D) -> Result<Option<ScheduleType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

/// Reads an explicit `null` the same way as an absent field.
pub(super) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Display category of a free-form server status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Active,
    Paused,
    Failed,
    Other,
}

impl StatusKind {
    pub fn from_status(status: &str) -> Self {
        match status.trim().to_lowercase().as_str() {
            "running" | "active" => StatusKind::Active,
            "paused" => StatusKind::Paused,
            "failed" | "error" => StatusKind::Failed,
            _ => StatusKind::Other,
        }
    }
}

/// A server-managed scheduled unit of work.
///
/// List and mutation selections only return a subset of the fields, so
/// everything except `id` is defaulted when absent or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_schedule_type")]
    pub schedule_type: Option<ScheduleType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron_expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_delay_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<JsonValue>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Job {
    pub fn status_kind(&self) -> StatusKind {
        StatusKind::from_status(&self.status)
    }

    /// Paused jobs are offered "resume", everything else "pause".
    pub fn is_paused(&self) -> bool {
        self.status_kind() == StatusKind::Paused
    }
}

/// Request-shaped subset of [`Job`] submitted to `createJob`.
///
/// Only the validation module constructs this type; the constructors encode
/// which schedule fields belong to which schedule type, so a value that mixes
/// a cron expression with an interval cannot exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobInput {
    name: String,
    schedule_type: ScheduleType,
    #[serde(skip_serializing_if = "Option::is_none")]
    cron_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    interval_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    initial_delay_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<JsonValue>,
}

impl CreateJobInput {
    pub(crate) fn cron(name: String, cron_expression: String, payload: Option<JsonValue>) -> Self {
        Self {
            name,
            schedule_type: ScheduleType::Cron,
            cron_expression: Some(cron_expression),
            interval_seconds: None,
            initial_delay_seconds: None,
            payload,
        }
    }

    pub(crate) fn fixed_rate(name: String, interval_seconds: u64, payload: Option<JsonValue>) -> Self {
        Self {
            name,
            schedule_type: ScheduleType::FixedRate,
            cron_expression: None,
            interval_seconds: Some(interval_seconds),
            initial_delay_seconds: None,
            payload,
        }
    }

    pub(crate) fn fixed_delay(
        name: String,
        interval_seconds: u64,
        initial_delay_seconds: Option<u64>,
        payload: Option<JsonValue>,
    ) -> Self {
        Self {
            name,
            schedule_type: ScheduleType::FixedDelay,
            cron_expression: None,
            interval_seconds: Some(interval_seconds),
            initial_delay_seconds,
            payload,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schedule_type(&self) -> ScheduleType {
        self.schedule_type
    }

    pub fn cron_expression(&self) -> Option<&str> {
        self.cron_expression.as_deref()
    }

    pub fn interval_seconds(&self) -> Option<u64> {
        self.interval_seconds
    }

    pub fn initial_delay_seconds(&self) -> Option<u64> {
        self.initial_delay_seconds
    }

    pub fn payload(&self) -> Option<&JsonValue> {
        self.payload.as_ref()
    }
}
