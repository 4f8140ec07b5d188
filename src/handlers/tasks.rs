// Task handlers
//
// A payload the store would reject (unknown description, missing field)
// answers 400. Other failures answer 500.

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use super::utils::{list_filter, parse_id};
use crate::api::{ApiResponse, HandlerResult};
use crate::app::AppState;
use crate::model::{Task, TaskPatch};

fn server_error(err: impl std::fmt::Display) -> ApiResponse {
    tracing::error!("tasks: {}", err);
    ApiResponse::new(StatusCode::INTERNAL_SERVER_ERROR, format!("Server Error {}", err)).error(true)
}

fn bad_request(rejection: JsonRejection) -> ApiResponse {
    ApiResponse::new(StatusCode::BAD_REQUEST, rejection.body_text()).error(true)
}

fn not_found(id: &str) -> ApiResponse {
    ApiResponse::new(StatusCode::NOT_FOUND, format!("Task with id:{} not found", id)).error(true)
}

/// GET /api/tasks
pub async fn list(State(state): State<AppState>, Query(query): Query<HashMap<String, String>>) -> HandlerResult {
    let filter = list_filter(&query).map_err(server_error)?;
    let tasks = state.repository::<Task>().find(&filter).await.map_err(server_error)?;

    Ok(ApiResponse::ok("Tasks found").data(&tasks).error(false))
}

/// GET /api/tasks/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let id = parse_id(&id)?;

    match state.repository::<Task>().find_by_id(&id).await {
        Ok(Some(task)) => Ok(ApiResponse::ok("Task found").data(&task).error(false)),
        Ok(None) => Err(not_found(&id.to_hex())),
        Err(e) => Err(server_error(e)),
    }
}

/// POST /api/tasks
pub async fn create(State(state): State<AppState>, payload: Result<Json<Task>, JsonRejection>) -> HandlerResult {
    let Json(task) = payload.map_err(bad_request)?;
    let created = state.repository::<Task>().create(&task).await.map_err(server_error)?;

    Ok(ApiResponse::created("Task created successfully").data(&created).error(false))
}

/// PUT /api/tasks/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> HandlerResult {
    let id = parse_id(&id)?;
    let Json(patch) = payload.map_err(bad_request)?;

    match state.repository::<Task>().update(&id, &patch).await {
        Ok(Some(task)) => Ok(ApiResponse::created(format!("Task with id:{} updated successfully", id))
            .data(&task)
            .error(false)),
        Ok(None) => Err(not_found(&id.to_hex())),
        Err(e) => Err(server_error(e)),
    }
}

/// DELETE /api/tasks/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let id = parse_id(&id)?;

    match state.repository::<Task>().delete_by_id(&id).await {
        Ok(Some(_)) => Ok(ApiResponse::no_content()),
        Ok(None) => Err(not_found(&id.to_hex())),
        Err(e) => Err(server_error(e)),
    }
}
