//! Client-side checks applied to a job draft before it is sent to the backend.

mod cron_preview;
mod draft;
mod field_errors;
mod payload;

pub use cron_preview::{CRON_HINT, CronPreview, describe_cron};
pub use draft::{
    FIELD_CRON_EXPRESSION, FIELD_INITIAL_DELAY_SECONDS, FIELD_INTERVAL_SECONDS, FIELD_NAME,
    FIELD_SCHEDULE_TYPE, JobDraft, validate, validate_draft,
};
pub use field_errors::FieldErrors;
pub use payload::PayloadEditor;
