/// Data records for Taskdesk
///
/// Plain records with no persistence behavior attached. Reads and writes go
/// through the repository traits in [`crate::store`].
///
/// # Models
///
/// - `user`: User accounts and credential material
/// - `task`: Tasks and their status
///
/// # Example
///
/// ```
/// use taskdesk_shared::models::task::{NewTask, TaskStatus};
///
/// let new_task = NewTask {
///     title: "Buy milk".to_string(),
///     description: "2% milk".to_string(),
/// };
/// assert_eq!(TaskStatus::default(), TaskStatus::Open);
/// # let _ = new_task;
/// ```

pub mod task;
pub mod user;
