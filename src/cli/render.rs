//! Plain-text rendering of jobs, logs and outcomes for the terminal.

use std::fmt::Write;

use crate::models::{ExecutionLog, Job};
use crate::services::notifications::{Notification, Severity};
use crate::validation::FieldErrors;

const EMPTY_JOBS: &str = "No jobs configured yet. Create your first job to get started.";
const EMPTY_LOGS: &str = "No execution logs for this job.";
const UNKNOWN_JOB: &str = "Unknown job.";

/// Lays out rows under a header, padding every column but the last to its
/// widest cell.
fn table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    for row in std::iter::once(&header).chain(rows) {
        let last = row.len().saturating_sub(1);
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            if i == last {
                line.push_str(cell);
            } else {
                let _ = write!(line, "{:<width$}  ", cell, width = widths[i]);
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

pub fn jobs_table(jobs: &[Job]) -> String {
    if jobs.is_empty() {
        return format!("{}\n", EMPTY_JOBS);
    }

    let rows: Vec<Vec<String>> = jobs
        .iter()
        .map(|job| {
            vec![
                job.id.clone(),
                job.name.clone(),
                or_dash(job.schedule_type.as_ref().map(|s| s.as_str())),
                job.status.clone(),
            ]
        })
        .collect();

    table(&["ID", "NAME", "SCHEDULE", "STATUS"], &rows)
}

/// Every field of a job, one per line. `None` renders the unknown-job
/// message.
pub fn job_details(job: Option<&Job>) -> String {
    let Some(job) = job else {
        return format!("{}\n", UNKNOWN_JOB);
    };

    let payload = job
        .payload
        .as_ref()
        .map(|value| serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()));
    let fields = [
        ("ID", job.id.clone()),
        ("Name", job.name.clone()),
        (
            "Schedule type",
            or_dash(job.schedule_type.as_ref().map(|s| s.as_str())),
        ),
        ("Cron expression", or_dash(job.cron_expression.as_deref())),
        (
            "Interval (s)",
            or_dash(job.interval_seconds.map(|v| v.to_string()).as_deref()),
        ),
        (
            "Initial delay (s)",
            or_dash(job.initial_delay_seconds.map(|v| v.to_string()).as_deref()),
        ),
        ("Status", job.status.clone()),
        ("Version", or_dash(job.version.map(|v| v.to_string()).as_deref())),
        ("Created", or_dash(job.created_at.as_deref())),
        ("Updated", or_dash(job.updated_at.as_deref())),
        ("Payload", or_dash(payload.as_deref())),
    ];

    let mut out = String::new();
    for (label, value) in fields {
        let _ = writeln!(out, "{:<18}{}", format!("{}:", label), value);
    }
    out
}

pub fn logs_table(job: Option<&Job>, logs: &[ExecutionLog]) -> String {
    let mut out = match job {
        Some(job) => format!("Job: {}\n\n", job.name),
        None => format!("{}\n\n", UNKNOWN_JOB),
    };

    if logs.is_empty() {
        out.push_str(EMPTY_LOGS);
        out.push('\n');
        return out;
    }

    let rows: Vec<Vec<String>> = logs
        .iter()
        .map(|log| {
            vec![
                or_dash(log.fire_time.as_deref()),
                log.status.clone(),
                or_dash(log.error_message.as_deref()),
            ]
        })
        .collect();

    out.push_str(&table(&["FIRE TIME", "STATUS", "ERROR"], &rows));
    out
}

/// One line per notification: a check or cross mark, the title and the
/// description when present.
pub fn notification_line(notification: &Notification) -> String {
    let mark = match notification.severity {
        Severity::Success => "✓",
        Severity::Error => "✗",
    };
    match notification.description.as_deref() {
        Some(description) if !description.is_empty() => {
            format!("{} {}: {}", mark, notification.title, description)
        }
        _ => format!("{} {}", mark, notification.title),
    }
}

pub fn field_errors(errors: &FieldErrors) -> String {
    let mut out = String::from("Please fix the following fields:\n");
    for (field, message) in errors.iter() {
        let _ = writeln!(out, "  {}: {}", field, message);
    }
    out
}
