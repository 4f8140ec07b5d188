// Employee handlers
//
// Unexpected failures (including an unparseable payload) answer 500
// "Server Error <err>". A missing document on get is treated the same way.

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use super::utils::{list_filter, parse_id};
use crate::api::{ApiResponse, HandlerResult};
use crate::app::AppState;
use crate::model::{Employee, EmployeePatch};

fn server_error(err: impl std::fmt::Display) -> ApiResponse {
    tracing::error!("employees: {}", err);
    ApiResponse::new(StatusCode::INTERNAL_SERVER_ERROR, format!("Server Error {}", err)).error(true)
}

fn not_found(id: &str) -> ApiResponse {
    ApiResponse::new(StatusCode::NOT_FOUND, format!("Employee with id:{} not found", id)).error(true)
}

/// GET /api/employees
pub async fn list(State(state): State<AppState>, Query(query): Query<HashMap<String, String>>) -> HandlerResult {
    let filter = list_filter(&query).map_err(server_error)?;
    let employees = state.repository::<Employee>().find(&filter).await.map_err(server_error)?;

    Ok(ApiResponse::ok("Employees found").data(&employees).error(false))
}

/// GET /api/employees/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let id = parse_id(&id)?;

    match state.repository::<Employee>().find_by_id(&id).await {
        Ok(Some(employee)) => Ok(ApiResponse::ok(format!("Employee with id:{} found", id))
            .data(&employee)
            .error(false)),
        Ok(None) => Err(server_error(format!("Employee with id:{} not found", id))),
        Err(e) => Err(server_error(e)),
    }
}

/// POST /api/employees
pub async fn create(State(state): State<AppState>, payload: Result<Json<Employee>, JsonRejection>) -> HandlerResult {
    let Json(employee) = payload.map_err(|rejection| server_error(rejection.body_text()))?;
    let created = state.repository::<Employee>().create(&employee).await.map_err(server_error)?;

    Ok(ApiResponse::created("Employee created successfully").data(&created).error(false))
}

/// PUT /api/employees/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EmployeePatch>, JsonRejection>,
) -> HandlerResult {
    let id = parse_id(&id)?;
    let Json(patch) = payload.map_err(|rejection| server_error(rejection.body_text()))?;

    match state.repository::<Employee>().update(&id, &patch).await {
        Ok(Some(employee)) => Ok(ApiResponse::created(format!("Employee with id:{} updated successfully", id))
            .data(&employee)
            .error(false)),
        Ok(None) => Err(not_found(&id.to_hex())),
        Err(e) => Err(server_error(e)),
    }
}

/// DELETE /api/employees/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let id = parse_id(&id)?;

    match state.repository::<Employee>().delete_by_id(&id).await {
        Ok(Some(_)) => Ok(ApiResponse::no_content()),
        Ok(None) => Err(not_found(&id.to_hex())),
        Err(e) => Err(server_error(e)),
    }
}
