//! Raw job definition as typed by an operator, and the rules that turn it
//! into a [`CreateJobInput`].

use std::borrow::Cow;
use std::num::IntErrorKind;

use serde_json::Value as JsonValue;
use validator::{Validate, ValidationError, ValidationErrors};

use super::field_errors::FieldErrors;
use crate::error::AppResult;
use crate::models::{CreateJobInput, Job, ScheduleType};

pub const FIELD_NAME: &str = "name";
pub const FIELD_SCHEDULE_TYPE: &str = "scheduleType";
pub const FIELD_CRON_EXPRESSION: &str = "cronExpression";
pub const FIELD_INTERVAL_SECONDS: &str = "intervalSeconds";
pub const FIELD_INITIAL_DELAY_SECONDS: &str = "initialDelaySeconds";

/// Unparsed form state. Every field is kept exactly as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobDraft {
    pub name: String,
    pub schedule_type: String,
    pub cron_expression: String,
    pub interval_seconds: String,
    pub initial_delay_seconds: String,
    /// Last successfully parsed payload document, see [`super::PayloadEditor`].
    pub payload: Option<JsonValue>,
}

impl JobDraft {
    /// Empty draft with the schedule type preselected to CRON.
    pub fn new() -> Self {
        Self {
            schedule_type: ScheduleType::Cron.as_str().to_string(),
            ..Default::default()
        }
    }

    /// Re-populates a draft from a validated request.
    pub fn from_input(input: &CreateJobInput) -> Self {
        Self {
            name: input.name().to_string(),
            schedule_type: input.schedule_type().as_str().to_string(),
            cron_expression: input.cron_expression().unwrap_or_default().to_string(),
            interval_seconds: input
                .interval_seconds()
                .map(|v| v.to_string())
                .unwrap_or_default(),
            initial_delay_seconds: input
                .initial_delay_seconds()
                .map(|v| v.to_string())
                .unwrap_or_default(),
            payload: input.payload().cloned(),
        }
    }

    /// Re-populates a draft from a job read back from the backend.
    pub fn from_job(job: &Job) -> Self {
        Self {
            name: job.name.clone(),
            schedule_type: job
                .schedule_type
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            cron_expression: job.cron_expression.clone().unwrap_or_default(),
            interval_seconds: job
                .interval_seconds
                .map(|v| v.to_string())
                .unwrap_or_default(),
            initial_delay_seconds: job
                .initial_delay_seconds
                .map(|v| v.to_string())
                .unwrap_or_default(),
            payload: job.payload.clone(),
        }
    }

    /// Runs every rule, collecting all violations, and builds the request
    /// when none fired.
    fn evaluate(&self) -> Result<CreateJobInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add(FIELD_NAME, rule("required", "Name is required."));
        }

        let schedule_type = self.schedule_type.parse::<ScheduleType>().ok();
        if schedule_type.is_none() {
            errors.add(
                FIELD_SCHEDULE_TYPE,
                rule("required", "Schedule type is required."),
            );
        }

        let mut cron_expression = None;
        let mut interval = None;
        let mut initial_delay = None;

        match schedule_type {
            Some(ScheduleType::Cron) => {
                let expr = self.cron_expression.trim();
                if expr.is_empty() {
                    errors.add(
                        FIELD_CRON_EXPRESSION,
                        rule("required", "Cron expression is required."),
                    );
                } else {
                    cron_expression = Some(expr.to_string());
                }
            }
            Some(ScheduleType::FixedRate) => {
                interval = check_interval(&self.interval_seconds, &mut errors);
            }
            Some(ScheduleType::FixedDelay) => {
                interval = check_interval(&self.interval_seconds, &mut errors);
                initial_delay = check_initial_delay(&self.initial_delay_seconds, &mut errors);
            }
            None => {}
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let name = name.to_string();
        let payload = self.payload.clone();
        match (schedule_type, cron_expression, interval) {
            (Some(ScheduleType::Cron), Some(expr), _) => {
                Ok(CreateJobInput::cron(name, expr, payload))
            }
            (Some(ScheduleType::FixedRate), _, Some(interval)) => {
                Ok(CreateJobInput::fixed_rate(name, interval, payload))
            }
            (Some(ScheduleType::FixedDelay), _, Some(interval)) => Ok(
                CreateJobInput::fixed_delay(name, interval, initial_delay, payload),
            ),
            // every rule passed, so a schedule type and its fields are present
            _ => {
                errors.add(
                    FIELD_SCHEDULE_TYPE,
                    rule("required", "Schedule type is required."),
                );
                Err(errors)
            }
        }
    }
}

impl Validate for JobDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.evaluate().map(|_| ())
    }
}

/// Turns a draft into a submittable request or the per-field messages that
/// block submission. Pure: the same draft always yields the same result.
pub fn validate(draft: &JobDraft) -> Result<CreateJobInput, FieldErrors> {
    draft.evaluate().map_err(FieldErrors::from)
}

/// [`validate`] with the failure folded into [`crate::error::AppError::Validation`].
pub fn validate_draft(draft: &JobDraft) -> AppResult<CreateJobInput> {
    validate(draft).map_err(Into::into)
}

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Largest magnitude an `f64` holds without losing whole seconds (2^53).
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Seconds as typed, classified before any range rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seconds {
    Whole(i64),
    Fraction { positive: bool },
    /// Above what the backend's signed 64-bit field stores.
    TooLarge,
    NotANumber,
}

/// Integers are parsed as such so large values are never rounded; decimal
/// and exponent notation is accepted only while it stays exact.
fn parse_seconds(raw: &str) -> Seconds {
    let text = raw.trim();
    match text.parse::<i64>() {
        Ok(value) => return Seconds::Whole(value),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => return Seconds::TooLarge,
            IntErrorKind::NegOverflow => return Seconds::Whole(i64::MIN),
            _ => {}
        },
    }

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if value.fract() != 0.0 {
                Seconds::Fraction {
                    positive: value > 0.0,
                }
            } else if value > MAX_EXACT_FLOAT {
                Seconds::TooLarge
            } else if value < -MAX_EXACT_FLOAT {
                Seconds::Whole(i64::MIN)
            } else {
                Seconds::Whole(value as i64)
            }
        }
        _ => Seconds::NotANumber,
    }
}

fn check_interval(raw: &str, errors: &mut ValidationErrors) -> Option<u64> {
    if raw.trim().is_empty() {
        errors.add(
            FIELD_INTERVAL_SECONDS,
            rule("required", "Interval is required."),
        );
        return None;
    }
    let error = match parse_seconds(raw) {
        Seconds::Whole(value) if value > 0 => return u64::try_from(value).ok(),
        Seconds::Fraction { positive: true } => {
            rule("whole", "Interval must be a whole number of seconds.")
        }
        Seconds::TooLarge => rule("max", "Interval is too large."),
        _ => rule("range", "Interval must be > 0."),
    };
    errors.add(FIELD_INTERVAL_SECONDS, error);
    None
}

fn check_initial_delay(raw: &str, errors: &mut ValidationErrors) -> Option<u64> {
    if raw.trim().is_empty() {
        return None;
    }
    let error = match parse_seconds(raw) {
        Seconds::Whole(value) if value >= 0 => return u64::try_from(value).ok(),
        Seconds::Fraction { positive: true } => {
            rule("whole", "Initial delay must be a whole number of seconds.")
        }
        Seconds::TooLarge => rule("max", "Initial delay is too large."),
        _ => rule("range", "Initial delay must be >= 0."),
    };
    errors.add(FIELD_INITIAL_DELAY_SECONDS, error);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use proptest::prelude::*;
    use serde_json::json;

    fn draft(name: &str, schedule_type: &str) -> JobDraft {
        JobDraft {
            name: name.to_string(),
            schedule_type: schedule_type.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_nightly_cron_draft_validates() {
        let mut d = draft("nightly", "CRON");
        d.cron_expression = "0 0 2 * * ?".to_string();

        let input = validate(&d).expect("draft should be valid");
        assert_eq!(input.name(), "nightly");
        assert_eq!(input.schedule_type(), ScheduleType::Cron);
        assert_eq!(input.cron_expression(), Some("0 0 2 * * ?"));
        assert_eq!(input.interval_seconds(), None);
        assert_eq!(input.initial_delay_seconds(), None);
        assert_eq!(input.payload(), None);
    }

    #[test]
    fn test_empty_name_and_zero_interval_report_both_fields() {
        let mut d = draft("", "FIXED_RATE");
        d.interval_seconds = "0".to_string();

        let errors = validate(&d).unwrap_err();
        let expected: FieldErrors = [
            ("name", "Name is required."),
            ("intervalSeconds", "Interval must be > 0."),
        ]
        .into_iter()
        .collect();
        assert_eq!(errors, expected);
    }

    #[test]
    fn test_whitespace_name_is_rejected() {
        let mut d = draft("   ", "CRON");
        d.cron_expression = "* * * * * ?".to_string();
        let errors = validate(&d).unwrap_err();
        assert_eq!(errors.get(FIELD_NAME), Some("Name is required."));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_name_is_trimmed_in_output() {
        let mut d = draft("  nightly  ", "CRON");
        d.cron_expression = "  0 0 2 * * ?  ".to_string();
        let input = validate(&d).unwrap();
        assert_eq!(input.name(), "nightly");
        assert_eq!(input.cron_expression(), Some("0 0 2 * * ?"));
    }

    #[test]
    fn test_unknown_schedule_type_only_reports_schedule_type() {
        let mut d = draft("job", "HOURLY");
        d.interval_seconds = "-4".to_string();
        let errors = validate(&d).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(FIELD_SCHEDULE_TYPE), Some("Schedule type is required."));
    }

    #[test]
    fn test_empty_cron_expression_is_rejected() {
        let d = draft("job", "CRON");
        let errors = validate(&d).unwrap_err();
        assert_eq!(errors.get(FIELD_CRON_EXPRESSION), Some("Cron expression is required."));
    }

    #[test]
    fn test_malformed_cron_is_accepted_when_non_empty() {
        let mut d = draft("job", "CRON");
        d.cron_expression = "not a cron".to_string();
        assert!(validate(&d).is_ok());
    }

    #[test]
    fn test_missing_interval_is_required() {
        let d = draft("job", "FIXED_RATE");
        let errors = validate(&d).unwrap_err();
        assert_eq!(errors.get(FIELD_INTERVAL_SECONDS), Some("Interval is required."));
    }

    #[test]
    fn test_non_numeric_interval_fails_range_check() {
        let mut d = draft("job", "FIXED_RATE");
        d.interval_seconds = "ten".to_string();
        let errors = validate(&d).unwrap_err();
        assert_eq!(errors.get(FIELD_INTERVAL_SECONDS), Some("Interval must be > 0."));
    }

    #[test]
    fn test_fractional_interval_is_rejected() {
        let mut d = draft("job", "FIXED_RATE");
        d.interval_seconds = "1.5".to_string();
        let errors = validate(&d).unwrap_err();
        assert_eq!(
            errors.get(FIELD_INTERVAL_SECONDS),
            Some("Interval must be a whole number of seconds.")
        );
    }

    #[test]
    fn test_large_interval_is_kept_exactly() {
        let mut d = draft("job", "FIXED_RATE");
        d.interval_seconds = "9007199254740993".to_string();
        let input = validate(&d).unwrap();
        assert_eq!(input.interval_seconds(), Some(9_007_199_254_740_993));

        d.interval_seconds = i64::MAX.to_string();
        let input = validate(&d).unwrap();
        assert_eq!(input.interval_seconds(), Some(i64::MAX as u64));

        d.interval_seconds = "1e3".to_string();
        assert_eq!(validate(&d).unwrap().interval_seconds(), Some(1000));
    }

    #[test]
    fn test_out_of_range_seconds_are_rejected() {
        for value in ["99999999999999999999", "9223372036854775808", "1e30"] {
            let mut d = draft("job", "FIXED_DELAY");
            d.interval_seconds = value.to_string();
            d.initial_delay_seconds = value.to_string();

            let errors = validate(&d).unwrap_err();
            assert_eq!(
                errors.get(FIELD_INTERVAL_SECONDS),
                Some("Interval is too large."),
                "interval {value}"
            );
            assert_eq!(
                errors.get(FIELD_INITIAL_DELAY_SECONDS),
                Some("Initial delay is too large."),
                "initial delay {value}"
            );
        }
    }

    #[test]
    fn test_negative_fraction_fails_range_check() {
        let mut d = draft("job", "FIXED_DELAY");
        d.interval_seconds = "-1.5".to_string();
        d.initial_delay_seconds = "-0.5".to_string();
        let errors = validate(&d).unwrap_err();
        assert_eq!(errors.get(FIELD_INTERVAL_SECONDS), Some("Interval must be > 0."));
        assert_eq!(
            errors.get(FIELD_INITIAL_DELAY_SECONDS),
            Some("Initial delay must be >= 0.")
        );
    }

    #[test]
    fn test_fixed_rate_output_has_only_interval() {
        let mut d = draft("job", "FIXED_RATE");
        d.interval_seconds = " 15 ".to_string();
        d.initial_delay_seconds = "3".to_string();
        d.cron_expression = "ignored".to_string();

        let input = validate(&d).unwrap();
        assert_eq!(input.interval_seconds(), Some(15));
        assert_eq!(input.initial_delay_seconds(), None);
        assert_eq!(input.cron_expression(), None);
    }

    #[test]
    fn test_fixed_delay_negative_initial_delay_only() {
        let mut d = draft("job", "FIXED_DELAY");
        d.interval_seconds = "10".to_string();
        d.initial_delay_seconds = "-1".to_string();

        let errors = validate(&d).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(FIELD_INITIAL_DELAY_SECONDS),
            Some("Initial delay must be >= 0.")
        );
        assert!(!errors.contains(FIELD_INTERVAL_SECONDS));
    }

    #[test]
    fn test_fixed_delay_empty_initial_delay_is_omitted() {
        let mut d = draft("job", "FIXED_DELAY");
        d.interval_seconds = "10".to_string();

        let input = validate(&d).unwrap();
        assert_eq!(input.interval_seconds(), Some(10));
        assert_eq!(input.initial_delay_seconds(), None);
    }

    #[test]
    fn test_fixed_delay_zero_initial_delay_is_kept() {
        let mut d = draft("job", "FIXED_DELAY");
        d.interval_seconds = "10".to_string();
        d.initial_delay_seconds = "0".to_string();

        let input = validate(&d).unwrap();
        assert_eq!(input.initial_delay_seconds(), Some(0));
    }

    #[test]
    fn test_payload_is_forwarded_verbatim() {
        let mut d = draft("job", "CRON");
        d.cron_expression = "0 * * * * ?".to_string();
        d.payload = Some(json!({"type": "demo", "nested": [1, 2, {"k": null}]}));

        let input = validate(&d).unwrap();
        assert_eq!(input.payload(), d.payload.as_ref());
    }

    #[test]
    fn test_validate_draft_wraps_field_errors() {
        let d = draft("", "CRON");
        match validate_draft(&d) {
            Err(AppError::Validation { errors }) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert!(fields.contains(&"name"));
                assert!(fields.contains(&"cronExpression"));
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_trait_agrees_with_validate_fn() {
        let d = draft("", "FIXED_RATE");
        assert!(Validate::validate(&d).is_err());
        let mut ok = draft("x", "FIXED_RATE");
        ok.interval_seconds = "5".to_string();
        assert!(Validate::validate(&ok).is_ok());
    }

    #[test]
    fn test_draft_from_job_revalidates() {
        let job = Job {
            id: "1".into(),
            name: "sweep".into(),
            schedule_type: Some(ScheduleType::FixedDelay),
            cron_expression: None,
            interval_seconds: Some(60),
            initial_delay_seconds: Some(5),
            payload: Some(json!({"k": "v"})),
            status: "ACTIVE".into(),
            version: Some(1),
            created_at: None,
            updated_at: None,
        };

        let input = validate(&JobDraft::from_job(&job)).unwrap();
        assert_eq!(input.interval_seconds(), Some(60));
        assert_eq!(input.initial_delay_seconds(), Some(5));
    }

    fn arb_schedule_draft() -> impl Strategy<Value = JobDraft> {
        let name = "[a-z][a-z0-9 _-]{0,20}";
        let cron = ("[0-9*?/]{1,4}( [0-9*?/]{1,4}){0,6}", name).prop_map(|(expr, name)| JobDraft {
            name,
            schedule_type: "CRON".into(),
            cron_expression: expr,
            ..Default::default()
        });
        let rate = (1u64..100_000, name).prop_map(|(interval, name)| JobDraft {
            name,
            schedule_type: "FIXED_RATE".into(),
            interval_seconds: interval.to_string(),
            ..Default::default()
        });
        let delay = (1u64..100_000, proptest::option::of(0u64..10_000), name).prop_map(
            |(interval, delay, name)| JobDraft {
                name,
                schedule_type: "FIXED_DELAY".into(),
                interval_seconds: interval.to_string(),
                initial_delay_seconds: delay.map(|d| d.to_string()).unwrap_or_default(),
                ..Default::default()
            },
        );
        prop_oneof![cron, rate, delay]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_cron_drafts_never_carry_interval_fields(
            name in "[a-zA-Z][a-zA-Z0-9 ]{0,20}",
            expr in "[^\\s]{1,10}( [^\\s]{1,10}){0,6}",
            interval in ".{0,6}",
        ) {
            let d = JobDraft {
                name,
                schedule_type: "CRON".into(),
                cron_expression: expr,
                interval_seconds: interval.clone(),
                initial_delay_seconds: interval,
                payload: None,
            };
            let input = validate(&d).expect("non-empty cron drafts validate");
            prop_assert_eq!(input.interval_seconds(), None);
            prop_assert_eq!(input.initial_delay_seconds(), None);
        }

        #[test]
        fn prop_non_positive_fixed_rate_interval_fails_on_interval_only(
            value in prop_oneof![
                (-100_000i64..=0).prop_map(|v| v.to_string()),
                "[a-zA-Z]{1,8}",
            ],
        ) {
            let d = JobDraft {
                name: "job".into(),
                schedule_type: "FIXED_RATE".into(),
                interval_seconds: value,
                ..Default::default()
            };
            let errors = validate(&d).unwrap_err();
            prop_assert_eq!(errors.get(FIELD_INTERVAL_SECONDS), Some("Interval must be > 0."));
            prop_assert!(!errors.contains(FIELD_CRON_EXPRESSION));
            prop_assert!(!errors.contains(FIELD_INITIAL_DELAY_SECONDS));
        }

        #[test]
        fn prop_validate_is_idempotent(d in arb_schedule_draft(), blank_name in any::<bool>()) {
            let mut d = d;
            if blank_name {
                d.name = String::new();
            }
            prop_assert_eq!(validate(&d), validate(&d));
        }

        #[test]
        fn prop_valid_input_round_trips_through_draft(d in arb_schedule_draft()) {
            let input = validate(&d).expect("generated drafts are valid");
            let again = validate(&JobDraft::from_input(&input)).expect("round trip stays valid");
            prop_assert_eq!(input, again);
        }
    }
}
