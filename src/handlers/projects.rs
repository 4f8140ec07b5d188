// Project handlers
//
// Projects are soft-deleted. Every read answers with assignments populated.

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use super::utils::{list_filter, parse_id, references_in};
use crate::api::{ApiResponse, HandlerResult};
use crate::app::AppState;
use crate::model::{Project, ProjectPatch};

fn server_error(err: impl std::fmt::Display) -> ApiResponse {
    tracing::error!("projects: {}", err);
    ApiResponse::new(StatusCode::INTERNAL_SERVER_ERROR, format!("Server Error {}", err)).error(true)
}

/// GET /api/projects
pub async fn list(State(state): State<AppState>, Query(query): Query<HashMap<String, String>>) -> HandlerResult {
    let filter = list_filter(&query).map_err(server_error)?;
    let projects = state.repository::<Project>().find(&filter).await.map_err(server_error)?;
    let views = state.populate().projects(projects).await.map_err(server_error)?;

    Ok(ApiResponse::ok("Projects list").data(&views).error(false))
}

/// GET /api/projects/withDeleted
pub async fn list_with_deleted(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> HandlerResult {
    let filter = list_filter(&query).map_err(server_error)?;
    let projects = state
        .repository::<Project>()
        .find_with_deleted(&filter)
        .await
        .map_err(server_error)?;
    let views = state.populate().projects(projects).await.map_err(server_error)?;

    Ok(ApiResponse::ok("Projects list").data(&views).error(false))
}

/// GET /api/projects/byEmployee/:id
pub async fn by_employee(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let id = parse_id(&id)?;
    let filter = references_in("employees", "employee", &id).map_err(server_error)?;
    let projects = state.repository::<Project>().find(&filter).await.map_err(server_error)?;
    let views = state.populate().projects(projects).await.map_err(server_error)?;

    Ok(ApiResponse::ok("Projects found").data(&views).error(false))
}

/// GET /api/projects/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let id = parse_id(&id)?;

    let project = match state.repository::<Project>().find_by_id(&id).await {
        Ok(Some(project)) => project,
        Ok(None) => {
            return Err(ApiResponse::new(StatusCode::NOT_FOUND, format!("Project with id {} not found", id)).error(true))
        }
        Err(e) => return Err(server_error(e)),
    };
    let view = state.populate().project(project).await.map_err(server_error)?;

    Ok(ApiResponse::ok("Project found").data(&view).error(false))
}

/// POST /api/projects
pub async fn create(State(state): State<AppState>, payload: Result<Json<Project>, JsonRejection>) -> HandlerResult {
    let Json(project) = payload.map_err(|rejection| server_error(rejection.body_text()))?;
    let created = state.repository::<Project>().create(&project).await.map_err(server_error)?;

    Ok(ApiResponse::created("Project created successfully").data(&created).error(false))
}

/// PUT /api/projects/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProjectPatch>, JsonRejection>,
) -> HandlerResult {
    let id = parse_id(&id)?;
    let Json(patch) = payload.map_err(|rejection| server_error(rejection.body_text()))?;

    match state.repository::<Project>().update(&id, &patch).await {
        Ok(Some(project)) => Ok(ApiResponse::created(format!("Project with id {} updated successfully", id))
            .data(&project)
            .error(false)),
        Ok(None) => Err(ApiResponse::new(StatusCode::NOT_FOUND, format!("Project with id:{} not found", id)).error(true)),
        Err(e) => Err(server_error(e)),
    }
}

/// DELETE /api/projects/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let id = parse_id(&id)?;

    match state.repository::<Project>().delete_by_id(&id).await {
        Ok(Some(_)) => Ok(ApiResponse::no_content()),
        Ok(None) => Err(ApiResponse::new(StatusCode::NOT_FOUND, format!("Project with id:{} not found", id)).error(true)),
        Err(e) => Err(server_error(e)),
    }
}
