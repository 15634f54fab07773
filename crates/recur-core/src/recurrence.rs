use chrono::{DateTime, Duration, Utc};

use crate::error::CoreError;
use crate::models::{NewTaskSpec, TaskRecord};

/// Computes the due date of the next occurrence.
///
/// Days are exact 24-hour spans in UTC: no timezone shifts, no skipping of
/// weekends or holidays.
///
/// # Returns
/// * `Result<DateTime<Utc>, CoreError>` - `completed + interval days`, or
///   `InvalidInput` if the interval is not positive or the result overflows
#[inline]
pub fn next_due_date(completed: DateTime<Utc>, interval_days: i64) -> Result<DateTime<Utc>, CoreError> {
    if interval_days <= 0 {
        return Err(CoreError::InvalidInput(format!(
            "Interval must be a positive number of days, got {interval_days}"
        )));
    }
    Duration::try_days(interval_days)
        .and_then(|span| completed.checked_add_signed(span))
        .ok_or_else(|| {
            CoreError::InvalidInput(format!(
                "Interval of {interval_days} days from {completed} is out of range"
            ))
        })
}

/// RecurrencePlanner: turns a completed recurring task into the request that creates its successor.
///
/// Responsibilities:
/// 1. Require a completion timestamp on the original
/// 2. Compute the successor's due date from completion time and interval
/// 3. Copy title and notes verbatim so the interval carries down the chain
///
/// The planner never touches the processed marker. Successors start
/// unprocessed because they inherit the notes as they were *before* the
/// original gets marked; callers must capture the notes before patching.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecurrencePlanner;

impl RecurrencePlanner {
    pub fn new() -> Self {
        Self
    }

    /// Plans the next occurrence of `task`.
    ///
    /// # Arguments
    /// * `task` - A completed task whose notes declare the interval
    /// * `interval_days` - The positive interval decoded from those notes
    ///
    /// # Returns
    /// * `Result<NewTaskSpec, CoreError>` - Fields for the successor task
    ///
    /// # Errors
    /// - `MissingCompletionTime` when the service returned no `completed` timestamp
    /// - `InvalidInput` for a non-positive or overflowing interval
    pub fn plan_next(&self, task: &TaskRecord, interval_days: i64) -> Result<NewTaskSpec, CoreError> {
        let completed = task.completed.ok_or_else(|| {
            CoreError::MissingCompletionTime(task.id.clone().unwrap_or_else(|| task.label().to_string()))
        })?;

        Ok(NewTaskSpec {
            title: task.title.clone(),
            notes: task.notes.clone(),
            due: Some(next_due_date(completed, interval_days)?),
        })
    }
}
