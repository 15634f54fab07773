//! One-task-at-a-time create and update, with an optional interval folded into notes.
//!
//! Unlike the batch scanner, every failure here goes straight back to the
//! caller: there is a single operation and nothing to isolate.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::CoreError;
use crate::metadata::MetadataCodec;
use crate::models::{NewTaskSpec, RecurringTask, TaskList, TaskPatch, TaskQuery, TaskStatus};
use crate::store::TaskStore;

#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub notes: Option<String>,
    pub due: Option<DateTime<Utc>>,
    /// Days between completions; must be positive when set
    pub interval: Option<i64>,
}

/// Changes to an existing task. Outer `None` means "leave as is".
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub notes: Option<Option<String>>,
    pub due: Option<Option<DateTime<Utc>>>,
    pub status: Option<TaskStatus>,
    /// `Some(None)` removes the interval, ending the chain
    pub interval: Option<Option<i64>>,
}

fn validate_interval(interval: Option<i64>) -> Result<(), CoreError> {
    match interval {
        Some(days) if days <= 0 => Err(CoreError::InvalidInput(format!(
            "Interval must be a positive number of days, got {days}"
        ))),
        _ => Ok(()),
    }
}

pub struct TaskEditor<S> {
    store: S,
    codec: MetadataCodec,
}

impl<S: TaskStore> TaskEditor<S> {
    pub fn new(store: S, codec: MetadataCodec) -> Self {
        Self { store, codec }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn list_task_lists(&self) -> Result<Vec<TaskList>, CoreError> {
        self.store.list_task_lists().await
    }

    /// Tasks in a list with their parsed intervals.
    pub async fn list_tasks(&self, list_id: &str, include_completed: bool) -> Result<Vec<RecurringTask>, CoreError> {
        let query = if include_completed {
            TaskQuery::all()
        } else {
            TaskQuery::open()
        };
        let tasks = self.store.list_tasks(list_id, &query).await?;
        Ok(tasks.into_iter().map(|t| self.codec.annotate(t)).collect())
    }

    pub async fn create_task(&self, list_id: &str, draft: TaskDraft) -> Result<RecurringTask, CoreError> {
        if draft.title.trim().is_empty() {
            return Err(CoreError::InvalidInput("Task title cannot be empty".to_string()));
        }
        validate_interval(draft.interval)?;

        let notes = match draft.interval {
            Some(days) => self.codec.with_interval(draft.notes.as_deref(), Some(days)),
            None => draft.notes,
        };
        let spec = NewTaskSpec {
            title: Some(draft.title),
            notes,
            due: draft.due,
        };

        let created = self.store.insert_task(list_id, &spec).await?;
        info!(
            list_id,
            task_id = created.id.as_deref().unwrap_or_default(),
            interval = draft.interval,
            "created task"
        );
        Ok(self.codec.annotate(created))
    }

    pub async fn update_task(
        &self,
        list_id: &str,
        task_id: &str,
        update: TaskUpdate,
    ) -> Result<RecurringTask, CoreError> {
        if let Some(interval) = update.interval {
            validate_interval(interval)?;
        }

        let notes = match (update.interval, update.notes) {
            (Some(interval), Some(notes)) => Some(self.codec.with_interval(notes.as_deref(), interval)),
            (Some(interval), None) => {
                let current = self.store.get_task(list_id, task_id).await?;
                Some(self.codec.with_interval(current.notes.as_deref(), interval))
            }
            (None, notes) => notes,
        };

        let completed = match update.status {
            Some(TaskStatus::NeedsAction) => Some(None),
            Some(TaskStatus::Completed) => Some(Some(Utc::now())),
            None => None,
        };

        let patch = TaskPatch {
            title: update.title,
            notes,
            due: update.due,
            status: update.status,
            completed,
        };
        if patch.is_empty() {
            return Err(CoreError::InvalidInput("Nothing to update".to_string()));
        }

        let updated = self.store.patch_task(list_id, task_id, &patch).await?;
        info!(list_id, task_id, "updated task");
        Ok(self.codec.annotate(updated))
    }
}
