/// Task model
///
/// A task belongs to exactly one user (`user_id`), fixed at creation. The
/// serialized form carries only the owner id, never the owner record.
///
/// # Status
///
/// ```text
/// OPEN ⇄ IN_PROGRESS ⇄ DONE
///   ↖_________________↙
/// ```
///
/// Any status may move to any other status, including itself.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id          BIGSERIAL PRIMARY KEY,
///     title       VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     status      VARCHAR(16) NOT NULL DEFAULT 'OPEN',
///     user_id     BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started yet
    #[default]
    Open,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

/// Error returned when a string is not a known task status
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{value}\" is an invalid status. The allowed values are: OPEN, IN_PROGRESS, DONE")]
pub struct ParseTaskStatusError {
    /// The rejected input
    pub value: String,
}

impl TaskStatus {
    /// Every status, in workflow order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Open, TaskStatus::InProgress, TaskStatus::Done];

    /// Converts status to its wire and database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "OPEN",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a status case-insensitively (`"done"`, `"Done"` and `"DONE"` are equal).
impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseTaskStatusError {
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Short title (never empty)
    pub title: String,

    /// Free-form description (never empty)
    pub description: String,

    /// Current status
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,

    /// Owner of the task
    pub user_id: i64,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Checks if `user_id` owns this task
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// Input for creating a new task
///
/// There is deliberately no status or owner field: new tasks always start
/// as [`TaskStatus::Open`] and belong to the authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Task title
    pub title: String,

    /// Task description
    pub description: String,
}
