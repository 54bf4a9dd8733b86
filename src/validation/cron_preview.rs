use std::fmt;

/// Shown next to the cron field regardless of its content.
pub const CRON_HINT: &str = "Use standard Quartz cron syntax, e.g. 0/10 * * * * ?";

const FIELD_LABELS: [&str; 7] = [
    "seconds",
    "minutes",
    "hours",
    "day-of-month",
    "month",
    "day-of-week",
    "year",
];

/// Read-only breakdown of a Quartz cron expression.
///
/// Purely informational; it never blocks submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CronPreview {
    Empty,
    /// Fewer than six whitespace-separated fields.
    Incomplete,
    /// Labeled fields in Quartz order. The year is present only when given.
    Fields(Vec<(&'static str, String)>),
}

pub fn describe_cron(expression: &str) -> CronPreview {
    let parts: Vec<&str> = expression.split_whitespace().collect();
    if parts.is_empty() {
        return CronPreview::Empty;
    }
    if parts.len() < 6 {
        return CronPreview::Incomplete;
    }
    CronPreview::Fields(
        FIELD_LABELS
            .iter()
            .zip(parts)
            .map(|(label, part)| (*label, part.to_string()))
            .collect(),
    )
}

impl fmt::Display for CronPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CronPreview::Empty => Ok(()),
            CronPreview::Incomplete => {
                f.write_str("Cron appears incomplete. Expecting Quartz 6+ fields.")
            }
            CronPreview::Fields(fields) => {
                f.write_str("Quartz cron: ")?;
                for (i, (label, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", label, value)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_expression() {
        assert_eq!(describe_cron("   "), CronPreview::Empty);
        assert_eq!(describe_cron("").to_string(), "");
    }

    #[test]
    fn test_incomplete_expression() {
        let preview = describe_cron("0 0 2 *");
        assert_eq!(preview, CronPreview::Incomplete);
        assert_eq!(
            preview.to_string(),
            "Cron appears incomplete. Expecting Quartz 6+ fields."
        );
    }

    #[test]
    fn test_six_field_expression() {
        assert_eq!(
            describe_cron("0 0 2 * * ?").to_string(),
            "Quartz cron: seconds=0, minutes=0, hours=2, day-of-month=*, month=*, day-of-week=?"
        );
    }

    #[test]
    fn test_year_field_and_extra_whitespace() {
        assert_eq!(
            describe_cron("  0/10  *  * * * ? 2030 ").to_string(),
            "Quartz cron: seconds=0/10, minutes=*, hours=*, day-of-month=*, month=*, day-of-week=?, year=2030"
        );
    }

    #[test]
    fn test_fields_beyond_year_are_dropped() {
        match describe_cron("0 0 0 1 1 ? 2030 extra") {
            CronPreview::Fields(fields) => assert_eq!(fields.len(), 7),
            other => panic!("Expected fields, got {:?}", other),
        }
    }
}
