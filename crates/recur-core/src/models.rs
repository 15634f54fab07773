use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    #[default]
    NeedsAction,
    Completed,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task status: {0}")]
pub struct ParseTaskStatusError(String);

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "needsaction" | "needs-action" | "open" | "pending" => Ok(TaskStatus::NeedsAction),
            "completed" | "done" => Ok(TaskStatus::Completed),
            _ => Err(ParseTaskStatusError(s.to_string())),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::NeedsAction => write!(f, "needsAction"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A named container of tasks in the remote service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

impl TaskList {
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("<unnamed list>")
    }
}

/// One task as the remote service represents it.
///
/// Only the fields the recurrence logic reads or writes are modelled; anything
/// else the service sends is ignored on deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    /// Present iff the task is completed, but the service does not guarantee it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    /// Free text; the only place recurrence metadata can live.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub deleted: bool,
}

impl TaskRecord {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Human-readable handle for log lines.
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.id.as_deref())
            .unwrap_or("<untitled>")
    }
}

/// Fields sent when creating a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
}

/// Partial update. `None` leaves a field untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    pub fn notes(notes: String) -> Self {
        Self {
            notes: Some(Some(notes)),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &TaskPatch::default()
    }

    /// Applies the patch to a local copy, the way the service does server-side.
    pub fn apply_to(&self, task: &mut TaskRecord) {
        if let Some(title) = &self.title {
            task.title = Some(title.clone());
        }
        if let Some(notes) = &self.notes {
            task.notes = notes.clone();
        }
        if let Some(due) = self.due {
            task.due = due;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

/// Server-side filter for listing tasks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskQuery {
    pub completed_min: Option<DateTime<Utc>>,
    pub show_completed: bool,
    pub show_hidden: bool,
}

impl TaskQuery {
    /// Tasks completed at or after `since`, including hidden ones.
    ///
    /// Completed tasks are hidden by the service once cleared from the list,
    /// so both flags must be on or recently completed tasks are missed.
    pub fn completed_since(since: DateTime<Utc>) -> Self {
        Self {
            completed_min: Some(since),
            show_completed: true,
            show_hidden: true,
        }
    }

    /// Open tasks only.
    pub fn open() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            completed_min: None,
            show_completed: true,
            show_hidden: true,
        }
    }
}

/// A task paired with the interval parsed from its notes, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringTask {
    pub task: TaskRecord,
    pub interval: Option<i64>,
}

impl RecurringTask {
    pub fn is_recurring(&self) -> bool {
        self.interval.is_some_and(|days| days > 0)
    }
}
