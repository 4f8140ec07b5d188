// Time sheet handlers
//
// Time sheets are soft-deleted. Reads populate project, task and employee.

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use super::utils::{list_filter, parse_id};
use crate::api::{ApiResponse, HandlerResult};
use crate::app::AppState;
use crate::filter::Filter;
use crate::model::{TimeSheet, TimeSheetPatch};

fn server_error(err: impl std::fmt::Display) -> ApiResponse {
    tracing::error!("timesheets: {}", err);
    ApiResponse::new(StatusCode::INTERNAL_SERVER_ERROR, format!("Server Error {}", err)).error(true)
}

fn not_found(id: &str) -> ApiResponse {
    ApiResponse::new(StatusCode::NOT_FOUND, format!("Time sheet with id {} not found", id)).error(true)
}

/// GET /api/timesheets
pub async fn list(State(state): State<AppState>, Query(query): Query<HashMap<String, String>>) -> HandlerResult {
    let filter = list_filter(&query).map_err(server_error)?;
    let timesheets = state.repository::<TimeSheet>().find(&filter).await.map_err(server_error)?;
    let views = state.populate().timesheets(timesheets).await.map_err(server_error)?;

    Ok(ApiResponse::ok("TimeSheets list").data(&views).error(false))
}

/// GET /api/timesheets/withDeleted
pub async fn list_with_deleted(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> HandlerResult {
    let filter = list_filter(&query).map_err(server_error)?;
    let timesheets = state
        .repository::<TimeSheet>()
        .find_with_deleted(&filter)
        .await
        .map_err(server_error)?;
    let views = state.populate().timesheets(timesheets).await.map_err(server_error)?;

    Ok(ApiResponse::ok("TimeSheets list").data(&views).error(false))
}

/// GET /api/timesheets/byEmployee/:id
pub async fn by_employee(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let id = parse_id(&id)?;
    let filter = Filter::all().equals("employee", id.to_hex()).map_err(server_error)?;
    let timesheets = state.repository::<TimeSheet>().find(&filter).await.map_err(server_error)?;
    let views = state.populate().timesheets(timesheets).await.map_err(server_error)?;

    Ok(ApiResponse::ok("TimeSheets List").data(&views).error(false))
}

/// GET /api/timesheets/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let id = parse_id(&id)?;

    let timesheet = match state.repository::<TimeSheet>().find_by_id(&id).await {
        Ok(Some(timesheet)) => timesheet,
        Ok(None) => return Err(not_found(&id.to_hex())),
        Err(e) => return Err(server_error(e)),
    };
    let view = state.populate().timesheet(timesheet).await.map_err(server_error)?;

    Ok(ApiResponse::ok("TimeSheet found").data(&view).error(false))
}

/// POST /api/timesheets
pub async fn create(State(state): State<AppState>, payload: Result<Json<TimeSheet>, JsonRejection>) -> HandlerResult {
    let Json(timesheet) = payload.map_err(|rejection| server_error(rejection.body_text()))?;
    let created = state.repository::<TimeSheet>().create(&timesheet).await.map_err(server_error)?;

    Ok(ApiResponse::created("TimeSheet created successfully").data(&created).error(false))
}

/// PUT /api/timesheets/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TimeSheetPatch>, JsonRejection>,
) -> HandlerResult {
    let id = parse_id(&id)?;
    let Json(patch) = payload.map_err(|rejection| server_error(rejection.body_text()))?;

    match state.repository::<TimeSheet>().update(&id, &patch).await {
        Ok(Some(timesheet)) => Ok(ApiResponse::created(format!("TimeSheet with id {} updated successfully", id))
            .data(&timesheet)
            .error(false)),
        Ok(None) => Err(not_found(&id.to_hex())),
        Err(e) => Err(server_error(e)),
    }
}

/// DELETE /api/timesheets/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let id = parse_id(&id)?;

    match state.repository::<TimeSheet>().delete_by_id(&id).await {
        Ok(Some(_)) => Ok(ApiResponse::no_content()),
        Ok(None) => Err(not_found(&id.to_hex())),
        Err(e) => Err(server_error(e)),
    }
}
