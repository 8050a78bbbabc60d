/// Task endpoints
///
/// Every handler runs behind the JWT middleware and passes the
/// authenticated user's ID to [`taskdesk_shared::tasks::TaskService`] as the
/// owner. A task owned by someone else is reported exactly like a task that
/// does not exist (`404`).
///
/// # Endpoints
///
/// - `GET /tasks?status=&search=` - List own tasks
/// - `GET /tasks/:id` - Fetch one task
/// - `POST /tasks` - Create a task (always starts OPEN)
/// - `PATCH /tasks/:id/status` - Change a task's status
/// - `DELETE /tasks/:id` - Delete a task
///
/// # Task JSON
///
/// ```json
/// {
///   "id": 7,
///   "title": "Buy milk",
///   "description": "2% from the corner store",
///   "status": "OPEN",
///   "user_id": 1,
///   "created_at": "2025-01-01T00:00:00Z",
///   "updated_at": "2025-01-01T00:00:00Z"
/// }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskdesk_shared::{
    auth::middleware::AuthContext,
    models::task::{NewTask, Task, TaskStatus},
    tasks::TaskFilter,
};
use validator::Validate;

/// Query string for `GET /tasks`
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListTasksQuery {
    /// Status name, case-insensitive
    pub status: Option<String>,

    /// Text to look for in title or description
    #[validate(length(min = 1, message = "search should not be empty"))]
    pub search: Option<String>,
}

impl ListTasksQuery {
    /// Converts the raw query into a filter
    pub fn into_filter(self) -> ApiResult<TaskFilter> {
        self.validate()?;

        let mut filter = TaskFilter::new();
        if let Some(status) = self.status {
            filter = filter.with_status(parse_status(&status)?);
        }
        if let Some(search) = self.search {
            filter = filter.with_search(search);
        }

        Ok(filter)
    }
}

/// Body of `POST /tasks`
///
/// Fields other than `title` and `description` are ignored, so a client
/// cannot choose the status or owner of a new task.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, message = "title should not be empty"))]
    pub title: String,

    #[validate(length(min = 1, message = "description should not be empty"))]
    pub description: String,
}

/// Body of `PATCH /tasks/:id/status`
#[derive(Debug, Deserialize)]
pub struct UpdateTaskStatusRequest {
    pub status: String,
}

fn parse_status(value: &str) -> ApiResult<TaskStatus> {
    value
        .parse::<TaskStatus>()
        .map_err(|e| ApiError::invalid_field("status", e.to_string()))
}

/// Lists the caller's tasks, optionally narrowed by status and search text
///
/// # Errors
///
/// - `400 Bad Request`: Unknown status or empty search
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    query: Result<Query<ListTasksQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Task>>> {
    let Query(query) = query?;
    let filter = query.into_filter()?;

    let tasks = state.tasks.list_tasks(auth.user_id, &filter).await?;
    Ok(Json(tasks))
}

/// Fetches one of the caller's tasks
///
/// # Errors
///
/// - `400 Bad Request`: Non-integer ID
/// - `404 Not Found`: No such task for this caller
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Task>> {
    let Path(id) = id?;

    let task = state.tasks.get_task(id, auth.user_id).await?;
    Ok(Json(task))
}

/// Creates a task owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: Missing or empty title or description
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Json(req) = payload?;
    req.validate()?;

    let task = state
        .tasks
        .create_task(
            auth.user_id,
            NewTask {
                title: req.title,
                description: req.description,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Sets the status of one of the caller's tasks
///
/// # Errors
///
/// - `400 Bad Request`: Unknown status or non-integer ID
/// - `404 Not Found`: No such task for this caller
pub async fn update_task_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTaskStatusRequest>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Path(id) = id?;
    let Json(req) = payload?;
    let status = parse_status(&req.status)?;

    let task = state
        .tasks
        .update_task_status(id, status, auth.user_id)
        .await?;
    Ok(Json(task))
}

/// Deletes one of the caller's tasks
///
/// # Errors
///
/// - `400 Bad Request`: Non-integer ID
/// - `404 Not Found`: No such task for this caller, including one already deleted
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;

    state.tasks.delete_task(id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
