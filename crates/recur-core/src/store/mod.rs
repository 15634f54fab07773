use crate::error::CoreError;
use crate::models::{NewTaskSpec, TaskList, TaskPatch, TaskQuery, TaskRecord};
use async_trait::async_trait;
use std::sync::Arc;

pub mod google;
pub mod memory;

pub use google::GoogleTasksClient;
pub use memory::InMemoryTaskStore;

/// The remote task-list service, reduced to the operations recurrence needs.
///
/// Every call may fail (network, auth, rate limits). Implementations report
/// failures as `CoreError`; deciding whether a failure is fatal is the caller's job.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_task_lists(&self) -> Result<Vec<TaskList>, CoreError>;

    /// Tasks in `list_id` matching `query`. Filtering happens server-side.
    async fn list_tasks(&self, list_id: &str, query: &TaskQuery) -> Result<Vec<TaskRecord>, CoreError>;

    async fn get_task(&self, list_id: &str, task_id: &str) -> Result<TaskRecord, CoreError>;

    /// Creates a task; the store assigns the id.
    async fn insert_task(&self, list_id: &str, task: &NewTaskSpec) -> Result<TaskRecord, CoreError>;

    /// Partial update; fields left `None` in the patch are unchanged.
    async fn patch_task(
        &self,
        list_id: &str,
        task_id: &str,
        patch: &TaskPatch,
    ) -> Result<TaskRecord, CoreError>;
}

#[async_trait]
impl<T: TaskStore + ?Sized> TaskStore for Arc<T> {
    async fn list_task_lists(&self) -> Result<Vec<TaskList>, CoreError> {
        (**self).list_task_lists().await
    }

    async fn list_tasks(&self, list_id: &str, query: &TaskQuery) -> Result<Vec<TaskRecord>, CoreError> {
        (**self).list_tasks(list_id, query).await
    }

    async fn get_task(&self, list_id: &str, task_id: &str) -> Result<TaskRecord, CoreError> {
        (**self).get_task(list_id, task_id).await
    }

    async fn insert_task(&self, list_id: &str, task: &NewTaskSpec) -> Result<TaskRecord, CoreError> {
        (**self).insert_task(list_id, task).await
    }

    async fn patch_task(
        &self,
        list_id: &str,
        task_id: &str,
        patch: &TaskPatch,
    ) -> Result<TaskRecord, CoreError> {
        (**self).patch_task(list_id, task_id, patch).await
    }
}
