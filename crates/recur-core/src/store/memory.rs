use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{NewTaskSpec, TaskList, TaskPatch, TaskQuery, TaskRecord, TaskStatus};
use crate::store::TaskStore;

/// Operations that can be made to fail on purpose.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fault {
    ListTaskLists,
    /// `list_tasks` for this list id
    ListTasks(String),
    /// `insert_task` for a task with this title
    InsertTitle(String),
    /// `patch_task` for this task id
    Patch(String),
}

#[derive(Default)]
struct MemoryState {
    lists: Vec<TaskList>,
    tasks: HashMap<String, Vec<TaskRecord>>,
    faults: HashSet<Fault>,
    inserts: usize,
    patches: usize,
}

/// A task store held in memory, with the service's filtering semantics.
///
/// Useful for offline runs and for exercising the scanner against failures.
#[derive(Default)]
pub struct InMemoryTaskStore {
    state: Mutex<MemoryState>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_list(&self, id: &str, title: &str) -> TaskList {
        let list = TaskList {
            id: Some(id.to_string()),
            title: Some(title.to_string()),
            updated: Some(Utc::now()),
        };
        let mut state = self.state();
        state.lists.push(list.clone());
        state.tasks.entry(id.to_string()).or_default();
        list
    }

    /// Adds a list the way a broken payload would arrive: without an id.
    pub fn add_list_without_id(&self, title: &str) {
        self.state().lists.push(TaskList {
            id: None,
            title: Some(title.to_string()),
            updated: None,
        });
    }

    /// Seeds a task as-is, assigning an id only if it has none.
    pub fn add_task(&self, list_id: &str, mut task: TaskRecord) -> TaskRecord {
        if task.id.is_none() {
            task.id = Some(Uuid::new_v4().to_string());
        }
        self.state()
            .tasks
            .entry(list_id.to_string())
            .or_default()
            .push(task.clone());
        task
    }

    /// Marks a task completed, as a user would in the service's own UI.
    pub fn complete_task(&self, list_id: &str, task_id: &str, at: DateTime<Utc>) -> Option<TaskRecord> {
        let mut state = self.state();
        let task = state
            .tasks
            .get_mut(list_id)?
            .iter_mut()
            .find(|t| t.id.as_deref() == Some(task_id))?;
        task.status = TaskStatus::Completed;
        task.completed = Some(at);
        task.updated = Some(at);
        Some(task.clone())
    }

    pub fn tasks(&self, list_id: &str) -> Vec<TaskRecord> {
        self.state().tasks.get(list_id).cloned().unwrap_or_default()
    }

    pub fn find_task(&self, list_id: &str, task_id: &str) -> Option<TaskRecord> {
        self.tasks(list_id)
            .into_iter()
            .find(|t| t.id.as_deref() == Some(task_id))
    }

    pub fn inject_fault(&self, fault: Fault) {
        self.state().faults.insert(fault);
    }

    pub fn clear_faults(&self) {
        self.state().faults.clear();
    }

    /// Number of successful inserts so far.
    pub fn insert_count(&self) -> usize {
        self.state().inserts
    }

    /// Number of successful patches so far.
    pub fn patch_count(&self) -> usize {
        self.state().patches
    }
}

fn injected(operation: &'static str, detail: &str) -> CoreError {
    CoreError::Store {
        operation,
        status: Some(503),
        message: format!("injected failure for {detail}"),
    }
}

fn matches_query(task: &TaskRecord, query: &TaskQuery) -> bool {
    if task.deleted {
        return false;
    }
    if task.hidden && !query.show_hidden {
        return false;
    }
    if task.is_completed() && !query.show_completed {
        return false;
    }
    match query.completed_min {
        Some(min) => task.completed.is_some_and(|done| done >= min),
        None => true,
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn list_task_lists(&self) -> Result<Vec<TaskList>, CoreError> {
        let state = self.state();
        if state.faults.contains(&Fault::ListTaskLists) {
            return Err(injected("list task lists", "task lists"));
        }
        Ok(state.lists.clone())
    }

    async fn list_tasks(&self, list_id: &str, query: &TaskQuery) -> Result<Vec<TaskRecord>, CoreError> {
        let state = self.state();
        if state.faults.contains(&Fault::ListTasks(list_id.to_string())) {
            return Err(injected("list tasks", list_id));
        }
        let tasks = state
            .tasks
            .get(list_id)
            .ok_or_else(|| CoreError::NotFound(format!("task list '{list_id}'")))?;
        Ok(tasks.iter().filter(|t| matches_query(t, query)).cloned().collect())
    }

    async fn get_task(&self, list_id: &str, task_id: &str) -> Result<TaskRecord, CoreError> {
        self.find_task(list_id, task_id)
            .ok_or_else(|| CoreError::NotFound(format!("task '{task_id}' in list '{list_id}'")))
    }

    async fn insert_task(&self, list_id: &str, task: &NewTaskSpec) -> Result<TaskRecord, CoreError> {
        let mut state = self.state();
        if let Some(title) = &task.title {
            if state.faults.contains(&Fault::InsertTitle(title.clone())) {
                return Err(injected("insert task", title));
            }
        }
        let record = TaskRecord {
            id: Some(Uuid::new_v4().to_string()),
            title: task.title.clone(),
            status: TaskStatus::NeedsAction,
            due: task.due,
            notes: task.notes.clone(),
            updated: Some(Utc::now()),
            ..Default::default()
        };
        state
            .tasks
            .get_mut(list_id)
            .ok_or_else(|| CoreError::NotFound(format!("task list '{list_id}'")))?
            .push(record.clone());
        state.inserts += 1;
        Ok(record)
    }

    async fn patch_task(
        &self,
        list_id: &str,
        task_id: &str,
        patch: &TaskPatch,
    ) -> Result<TaskRecord, CoreError> {
        let mut state = self.state();
        if state.faults.contains(&Fault::Patch(task_id.to_string())) {
            return Err(injected("patch task", task_id));
        }
        let task = state
            .tasks
            .get_mut(list_id)
            .and_then(|tasks| tasks.iter_mut().find(|t| t.id.as_deref() == Some(task_id)))
            .ok_or_else(|| CoreError::NotFound(format!("task '{task_id}' in list '{list_id}'")))?;
        patch.apply_to(task);
        task.updated = Some(Utc::now());
        let updated = task.clone();
        state.patches += 1;
        Ok(updated)
    }
}
