use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use super::error::{TaskError, TaskResult};
use super::filter::TaskFilter;
use crate::models::task::{NewTask, Task, TaskStatus};
use crate::store::{StoreError, TaskRepository};

/// Longest accepted title, in characters
pub const MAX_TITLE_LENGTH: usize = 255;

/// Task use cases, scoped to the calling owner.
///
/// Depends only on the [`TaskRepository`] port. Callers pass an owner ID
/// that has already been authenticated; the service never accepts an owner
/// from request data.
#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    /// Lists the owner's tasks matching `filter`.
    #[instrument(name = "tasks.service.list_tasks", skip(self, filter), fields(owner_id = owner_id))]
    pub async fn list_tasks(&self, owner_id: i64, filter: &TaskFilter) -> TaskResult<Vec<Task>> {
        debug!(?filter, "Listing tasks");

        let tasks = self
            .repo
            .list_by_owner(owner_id, filter)
            .await
            .map_err(|e| storage_failure("list_tasks", owner_id, filter, e))?;

        debug!(count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    /// Fetches one of the owner's tasks.
    ///
    /// Fails with [`TaskError::NotFound`] both when the task does not exist
    /// and when it belongs to someone else.
    #[instrument(name = "tasks.service.get_task", skip(self), fields(owner_id = owner_id, task_id = id))]
    pub async fn get_task(&self, id: i64, owner_id: i64) -> TaskResult<Task> {
        debug!("Getting task by id");

        self.repo
            .find_by_id_and_owner(id, owner_id)
            .await
            .map_err(|e| storage_failure("get_task", owner_id, &id, e))?
            .ok_or_else(|| {
                warn!("Task not found or access denied");
                TaskError::not_found(id)
            })
    }

    /// Creates a task for the owner. New tasks always start as OPEN.
    #[instrument(name = "tasks.service.create_task", skip(self, new_task), fields(owner_id = owner_id))]
    pub async fn create_task(&self, owner_id: i64, new_task: NewTask) -> TaskResult<Task> {
        validate_new_task(&new_task)?;

        let task = self
            .repo
            .insert(owner_id, new_task.clone())
            .await
            .map_err(|e| storage_failure("create_task", owner_id, &new_task, e))?;

        info!(task_id = task.id, "Created task");
        Ok(task)
    }

    /// Sets the status of one of the owner's tasks.
    ///
    /// Any transition is allowed, including to the current status.
    #[instrument(name = "tasks.service.update_task_status", skip(self), fields(owner_id = owner_id, task_id = id))]
    pub async fn update_task_status(
        &self,
        id: i64,
        status: TaskStatus,
        owner_id: i64,
    ) -> TaskResult<Task> {
        let current = self.get_task(id, owner_id).await?;
        debug!(from = %current.status, to = %status, "Updating task status");

        // The row can vanish between lookup and update; treat that as not found.
        let updated = self
            .repo
            .update_status(id, owner_id, status)
            .await
            .map_err(|e| storage_failure("update_task_status", owner_id, &status, e))?
            .ok_or_else(|| TaskError::not_found(id))?;

        info!(status = %updated.status, "Updated task status");
        Ok(updated)
    }

    /// Deletes one of the owner's tasks.
    ///
    /// Deleting the same task twice fails the second time with
    /// [`TaskError::NotFound`].
    #[instrument(name = "tasks.service.delete_task", skip(self), fields(owner_id = owner_id, task_id = id))]
    pub async fn delete_task(&self, id: i64, owner_id: i64) -> TaskResult<()> {
        let deleted = self
            .repo
            .delete_by_id_and_owner(id, owner_id)
            .await
            .map_err(|e| storage_failure("delete_task", owner_id, &id, e))?;

        if !deleted {
            warn!("Task not found or access denied");
            return Err(TaskError::not_found(id));
        }

        info!("Deleted task");
        Ok(())
    }

    /// Checks that the underlying store is reachable.
    pub async fn storage_healthy(&self) -> bool {
        match self.repo.health_check().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Task store health check failed");
                false
            }
        }
    }
}

fn validate_new_task(new_task: &NewTask) -> TaskResult<()> {
    if new_task.title.trim().is_empty() {
        return Err(TaskError::validation("title", "title should not be empty"));
    }
    if new_task.title.chars().count() > MAX_TITLE_LENGTH {
        return Err(TaskError::validation(
            "title",
            format!("title must be at most {} characters", MAX_TITLE_LENGTH),
        ));
    }
    if new_task.description.trim().is_empty() {
        return Err(TaskError::validation("description", "description should not be empty"));
    }
    Ok(())
}

/// Logs a store failure with its context and converts it to an opaque domain error.
fn storage_failure<P>(operation: &'static str, owner_id: i64, payload: &P, err: StoreError) -> TaskError
where
    P: Serialize + ?Sized,
{
    let payload = serde_json::to_string(payload).unwrap_or_else(|_| "<unserializable>".to_string());
    error!(operation, owner_id, %payload, error = %err, "Task storage operation failed");
    TaskError::Storage(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryTaskRepository;

    fn service() -> TaskService {
        TaskService::new(Arc::new(InMemoryTaskRepository::new()))
    }

    fn new_task(title: &str, description: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_blank_fields() {
        let service = service();

        let err = service.create_task(1, new_task("", "desc")).await.unwrap_err();
        assert!(matches!(err, TaskError::Validation { field: "title", .. }));

        let err = service.create_task(1, new_task("title", "   ")).await.unwrap_err();
        assert!(matches!(err, TaskError::Validation { field: "description", .. }));

        let long_title = "x".repeat(MAX_TITLE_LENGTH + 1);
        let err = service.create_task(1, new_task(&long_title, "desc")).await.unwrap_err();
        assert!(matches!(err, TaskError::Validation { field: "title", .. }));

        assert!(service.list_tasks(1, &TaskFilter::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_task_returns_not_found_for_missing_task() {
        let err = service().get_task(42, 1).await.unwrap_err();
        assert!(matches!(err, TaskError::NotFound { id: 42 }));
    }

    #[tokio::test]
    async fn test_update_to_same_status_succeeds() {
        let service = service();
        let task = service.create_task(1, new_task("t", "d")).await.unwrap();

        let updated = service
            .update_task_status(task.id, TaskStatus::Open, 1)
            .await
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Open);
    }

    #[tokio::test]
    async fn test_any_to_any_transition() {
        let service = service();
        let task = service.create_task(1, new_task("t", "d")).await.unwrap();

        for status in [TaskStatus::Done, TaskStatus::Open, TaskStatus::InProgress, TaskStatus::Done] {
            let updated = service.update_task_status(task.id, status, 1).await.unwrap();
            assert_eq!(updated.status, status);
        }
    }

    #[tokio::test]
    async fn test_storage_healthy_with_memory_store() {
        assert!(service().storage_healthy().await);
    }
}
