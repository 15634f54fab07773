//! Which completed tasks should spawn a successor.
//!
//! A task qualifies when it is completed, its notes decode to metadata with a
//! positive whole-number interval, and it carries no processed marker yet.
//! Every other case maps to a reason instead of an error, so the scanner can
//! log why a task was passed over.

use crate::metadata::MetadataCodec;
use crate::models::TaskRecord;

/// Outcome of checking one task against the regeneration rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// Completed, tagged with a positive interval, not yet processed.
    Eligible { interval: i64 },
    NotCompleted,
    /// Notes absent or not a JSON object.
    NoMetadata,
    /// Metadata present but the interval is missing, non-numeric or not positive.
    NoInterval,
    AlreadyProcessed,
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible { .. })
    }

    pub fn interval(&self) -> Option<i64> {
        match self {
            Eligibility::Eligible { interval } => Some(*interval),
            _ => None,
        }
    }
}

impl std::fmt::Display for Eligibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Eligibility::Eligible { interval } => write!(f, "eligible (every {interval} days)"),
            Eligibility::NotCompleted => write!(f, "not completed"),
            Eligibility::NoMetadata => write!(f, "no recurrence metadata"),
            Eligibility::NoInterval => write!(f, "no positive interval"),
            Eligibility::AlreadyProcessed => write!(f, "already recurred"),
        }
    }
}

/// Classifies a task. Never fails: anything unexpected in the notes simply
/// makes the task ineligible.
pub fn evaluate(codec: &MetadataCodec, task: &TaskRecord) -> Eligibility {
    if !task.is_completed() {
        return Eligibility::NotCompleted;
    }
    let Some(metadata) = codec.decode(task.notes.as_deref()) else {
        return Eligibility::NoMetadata;
    };
    let interval = match codec.interval(&metadata) {
        Some(days) if days > 0 => days,
        _ => return Eligibility::NoInterval,
    };
    if codec.is_processed(&metadata) {
        return Eligibility::AlreadyProcessed;
    }
    Eligibility::Eligible { interval }
}

pub fn is_eligible(codec: &MetadataCodec, task: &TaskRecord) -> bool {
    evaluate(codec, task).is_eligible()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use rstest::rstest;

    fn completed(notes: Option<&str>) -> TaskRecord {
        TaskRecord {
            id: Some("t1".to_string()),
            title: Some("Water plants".to_string()),
            status: TaskStatus::Completed,
            completed: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            notes: notes.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_completed_task_with_interval_is_eligible() {
        let task = completed(Some(r#"{"interval": 7}"#));
        assert_eq!(
            evaluate(&MetadataCodec::default(), &task),
            Eligibility::Eligible { interval: 7 }
        );
        assert!(is_eligible(&MetadataCodec::default(), &task));
    }

    #[test]
    fn test_open_task_is_never_eligible() {
        let mut task = completed(Some(r#"{"interval": 7}"#));
        task.status = TaskStatus::NeedsAction;
        assert_eq!(evaluate(&MetadataCodec::default(), &task), Eligibility::NotCompleted);
    }

    #[rstest]
    #[case::absent(None, Eligibility::NoMetadata)]
    #[case::prose(Some("just a reminder"), Eligibility::NoMetadata)]
    #[case::malformed(Some("{interval: 7}"), Eligibility::NoMetadata)]
    #[case::zero(Some(r#"{"interval": 0}"#), Eligibility::NoInterval)]
    #[case::negative(Some(r#"{"interval": -3}"#), Eligibility::NoInterval)]
    #[case::string(Some(r#"{"interval": "7"}"#), Eligibility::NoInterval)]
    #[case::missing(Some(r#"{"note": "x"}"#), Eligibility::NoInterval)]
    #[case::processed(
        Some(r#"{"interval": 7, "lastRecurred": "2024-01-02T00:00:00.000Z"}"#),
        Eligibility::AlreadyProcessed
    )]
    fn test_ineligible_reasons(#[case] notes: Option<&str>, #[case] expected: Eligibility) {
        let task = completed(notes);
        assert_eq!(evaluate(&MetadataCodec::default(), &task), expected);
        assert!(!is_eligible(&MetadataCodec::default(), &task));
    }

    #[test]
    fn test_eligibility_does_not_require_completion_time() {
        let mut task = completed(Some(r#"{"interval": 1}"#));
        task.completed = None;
        assert!(is_eligible(&MetadataCodec::default(), &task));
    }

    proptest! {
        #[test]
        fn prop_open_tasks_are_never_eligible(notes in proptest::option::of(".*"), days in any::<i64>()) {
            let codec = MetadataCodec::default();
            let mut task = completed(notes.as_deref());
            task.status = TaskStatus::NeedsAction;
            prop_assert!(!is_eligible(&codec, &task));

            task.notes = Some(format!(r#"{{"interval": {days}}}"#));
            prop_assert!(!is_eligible(&codec, &task));
        }
    }
}
