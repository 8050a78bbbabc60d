/// Task query, ownership and validation layer
///
/// - [`filter`]: owner-scoped query engine (status and search predicates)
/// - [`service`]: the task use cases, with not-found and validation semantics
/// - [`error`]: the domain error taxonomy
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskdesk_shared::models::task::{NewTask, TaskStatus};
/// use taskdesk_shared::store::memory::InMemoryTaskRepository;
/// use taskdesk_shared::tasks::{TaskError, TaskFilter, TaskService};
///
/// # async fn example() -> Result<(), TaskError> {
/// let service = TaskService::new(Arc::new(InMemoryTaskRepository::new()));
///
/// let task = service
///     .create_task(1, NewTask { title: "Buy milk".into(), description: "2% milk".into() })
///     .await?;
/// assert_eq!(task.status, TaskStatus::Open);
///
/// let found = service.list_tasks(1, &TaskFilter::new().with_search("MILK")).await?;
/// assert_eq!(found.len(), 1);
///
/// // Another user cannot see it
/// assert!(matches!(service.get_task(task.id, 2).await, Err(TaskError::NotFound { .. })));
/// # Ok(())
/// # }
/// ```

pub mod error;
pub mod filter;
pub mod service;

pub use error::{TaskError, TaskResult};
pub use filter::TaskFilter;
pub use service::TaskService;
