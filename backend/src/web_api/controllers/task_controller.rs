use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    app_state::SharedState,
    create_task_request::CreateTaskRequest,
    data_access::task_store::{StoreError, TaskStore},
    delete_task_response::DeleteTaskResponse,
    error::ApiError,
    task::Task,
    update_task_request::UpdateTaskRequest,
};

pub struct TaskController {}

impl TaskController {
    // GET /api/tasks
    pub async fn get_all(State(state): State<SharedState>) -> Result<Json<Vec<Task>>, ApiError> {
        with_store(&state, |store| store.list())
            .await
            .map(Json)
            .map_err(|e| {
                error!(error = %e, "listing tasks failed");
                ApiError::internal("Failed to fetch tasks")
            })
    }

    // POST /api/tasks
    pub async fn add(
        State(state): State<SharedState>,
        payload: Result<Json<CreateTaskRequest>, JsonRejection>,
    ) -> Result<(StatusCode, Json<Task>), ApiError> {
        let Json(body) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
        let title = body.title.unwrap_or_default();
        let description = body.description.unwrap_or_default();

        match with_store(&state, move |store| store.create(title, description)).await {
            Ok(task) => {
                info!(task_id = %task.id, "task created");
                Ok((StatusCode::CREATED, Json(task)))
            }
            Err(StoreError::Validation(message)) => Err(ApiError::bad_request(message)),
            Err(e) => {
                error!(error = %e, "creating task failed");
                Err(ApiError::internal("Failed to create task"))
            }
        }
    }

    // PUT /api/tasks/:id
    pub async fn edit(
        State(state): State<SharedState>,
        id: Result<Path<Uuid>, PathRejection>,
        payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
    ) -> Result<Json<Task>, ApiError> {
        let Path(id) = id.map_err(|_| ApiError::not_found("Task not found"))?;
        let Json(body) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

        match with_store(&state, move |store| store.update(id, body)).await {
            Ok(task) => {
                info!(task_id = %task.id, completed = task.completed, "task updated");
                Ok(Json(task))
            }
            Err(StoreError::NotFound) => Err(ApiError::not_found("Task not found")),
            Err(e) => {
                error!(task_id = %id, error = %e, "updating task failed");
                Err(ApiError::internal("Failed to update task"))
            }
        }
    }

    // DELETE /api/tasks/:id
    pub async fn delete(
        State(state): State<SharedState>,
        id: Result<Path<Uuid>, PathRejection>,
    ) -> Result<Json<DeleteTaskResponse>, ApiError> {
        let Path(id) = id.map_err(|_| ApiError::not_found("Task not found"))?;

        match with_store(&state, move |store| store.delete(id)).await {
            Ok(()) => {
                info!(task_id = %id, "task deleted");
                Ok(Json(DeleteTaskResponse {
                    message: "Task deleted successfully".to_string(),
                }))
            }
            Err(StoreError::NotFound) => Err(ApiError::not_found("Task not found")),
            Err(e) => {
                error!(task_id = %id, error = %e, "deleting task failed");
                Err(ApiError::internal("Failed to delete task"))
            }
        }
    }
}

/// Runs a store call on the blocking pool; redb commits fsync.
async fn with_store<T, F>(state: &SharedState, op: F) -> Result<T, StoreError>
where
    F: FnOnce(&TaskStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let store = state.task_store.clone();
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| StoreError::Storage(e.to_string()))?
}
