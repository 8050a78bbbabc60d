use crate::store::StoreError;

/// Result type for task service operations
pub type TaskResult<T> = Result<T, TaskError>;

/// Domain errors surfaced by [`super::TaskService`]
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Malformed input, rejected before the store is touched
    #[error("Validation failed: {message}")]
    Validation { field: &'static str, message: String },

    /// No task with this ID belongs to the caller
    #[error("Task with ID \"{id}\" not found")]
    NotFound { id: i64 },

    /// The store failed unexpectedly
    #[error("Storage failure: {0}")]
    Storage(#[source] StoreError),
}

impl TaskError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        TaskError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(id: i64) -> Self {
        TaskError::NotFound { id }
    }
}
