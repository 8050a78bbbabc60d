/// Persistence ports and their implementations
///
/// The service layer depends only on the traits defined here. Two
/// implementations ship with the crate:
///
/// - [`postgres`]: sqlx-backed repositories for production
/// - [`memory`]: deterministic in-memory repositories for tests and local runs
///
/// Every task operation takes the owner ID explicitly. There is no method
/// that reads or mutates a task without it.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskdesk_shared::store::{memory::InMemoryTaskRepository, TaskRepository};
/// use taskdesk_shared::models::task::NewTask;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let repo: Arc<dyn TaskRepository> = Arc::new(InMemoryTaskRepository::new());
/// let task = repo
///     .insert(1, NewTask { title: "Write docs".into(), description: "README".into() })
///     .await?;
/// assert!(repo.find_by_id_and_owner(task.id, 2).await?.is_none());
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::models::task::{NewTask, Task, TaskStatus};
use crate::models::user::{NewUser, User};
use crate::tasks::filter::TaskFilter;

/// PostgreSQL SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database rejected or failed the query
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    /// A unique constraint was violated (e.g. duplicate username)
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// The store cannot be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                return StoreError::UniqueViolation(constraint);
            }
        }

        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// Result type for repository operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Task persistence port
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts a new task owned by `owner_id` with status OPEN.
    ///
    /// The store assigns the ID and timestamps.
    async fn insert(&self, owner_id: i64, task: NewTask) -> StoreResult<Task>;

    /// Loads a task matching both `id` and `owner_id`.
    async fn find_by_id_and_owner(&self, id: i64, owner_id: i64) -> StoreResult<Option<Task>>;

    /// Lists the owner's tasks matching `filter`, in ascending ID order.
    async fn list_by_owner(&self, owner_id: i64, filter: &TaskFilter) -> StoreResult<Vec<Task>>;

    /// Sets the status of a task matching both `id` and `owner_id`.
    ///
    /// Returns `None` when no such task exists.
    async fn update_status(
        &self,
        id: i64,
        owner_id: i64,
        status: TaskStatus,
    ) -> StoreResult<Option<Task>>;

    /// Deletes a task matching both `id` and `owner_id`. Returns true if a row was deleted.
    async fn delete_by_id_and_owner(&self, id: i64, owner_id: i64) -> StoreResult<bool>;

    /// Verifies the store is reachable.
    async fn health_check(&self) -> StoreResult<()>;
}

/// User persistence port
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new user.
    ///
    /// Fails with [`StoreError::UniqueViolation`] if the username is taken.
    async fn insert(&self, user: NewUser) -> StoreResult<User>;

    /// Loads a user by login name.
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Loads a user by ID.
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>>;
}
