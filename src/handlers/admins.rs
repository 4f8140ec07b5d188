// Admin handlers
//
// Payloads are checked with `validator` before they reach the store; any
// rejection answers 406. Read and delete failures answer 404, write
// failures 400.

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use super::utils::{list_filter, parse_id};
use crate::api::{ApiResponse, HandlerResult};
use crate::app::AppState;
use crate::error::ApiError;
use crate::model::{Admin, AdminPatch};

fn not_acceptable(err: impl std::fmt::Display) -> ApiResponse {
    tracing::debug!("admins: payload rejected: {}", err);
    ApiError::not_acceptable(err.to_string()).into()
}

/// Catch-path body: `message` only, no `error` flag.
fn failure(status: StatusCode, prefix: &str, err: impl std::fmt::Display) -> ApiResponse {
    tracing::error!("admins: {}", err);
    ApiResponse::new(status, format!("{}: {}", prefix, err))
}

/// GET /api/admins
pub async fn list(State(state): State<AppState>, Query(query): Query<HashMap<String, String>>) -> HandlerResult {
    let filter = list_filter(&query).map_err(|e| failure(StatusCode::NOT_FOUND, "An error ocurred", e))?;
    let admins = state
        .repository::<Admin>()
        .find(&filter)
        .await
        .map_err(|e| failure(StatusCode::NOT_FOUND, "An error ocurred", e))?;

    if admins.is_empty() {
        return Err(ApiResponse::new(StatusCode::NOT_FOUND, "Admin not found").error(true));
    }
    Ok(ApiResponse::ok("Admins found").data(&admins).error(false))
}

/// GET /api/admins/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let id = parse_id(&id)?;

    match state.repository::<Admin>().find_by_id(&id).await {
        Ok(Some(admin)) => Ok(ApiResponse::ok("Admin Found").data(&admin).error(false)),
        Ok(None) => Err(failure(
            StatusCode::NOT_FOUND,
            "Something was wrong",
            format!("ID {} doesnt match with a valid admin!", id),
        )),
        Err(e) => Err(failure(StatusCode::NOT_FOUND, "Something was wrong", e)),
    }
}

/// POST /api/admins
pub async fn create(State(state): State<AppState>, payload: Result<Json<Admin>, JsonRejection>) -> HandlerResult {
    let Json(admin) = payload.map_err(|rejection| not_acceptable(rejection.body_text()))?;
    admin.validate().map_err(not_acceptable)?;

    let created = state
        .repository::<Admin>()
        .create(&admin)
        .await
        .map_err(|e| failure(StatusCode::BAD_REQUEST, "An error ocurred", e))?;

    Ok(ApiResponse::created("Admin created").data(&created).error(false))
}

/// PUT /api/admins/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AdminPatch>, JsonRejection>,
) -> HandlerResult {
    let id = parse_id(&id)?;
    let Json(patch) = payload.map_err(|rejection| not_acceptable(rejection.body_text()))?;
    patch.validate().map_err(not_acceptable)?;

    match state.repository::<Admin>().update(&id, &patch).await {
        Ok(Some(admin)) => Ok(ApiResponse::ok(format!("Admin with id {} found and successfully edited!", id))
            .data(&admin)
            .error(false)),
        Ok(None) => Err(ApiResponse::new(StatusCode::NOT_FOUND, format!("Admin with {} dont exist on DB.", id)).error(true)),
        Err(e) => Err(failure(StatusCode::BAD_REQUEST, "Something was wrong", e)),
    }
}

/// DELETE /api/admins/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let id = parse_id(&id)?;

    match state.repository::<Admin>().delete_by_id(&id).await {
        Ok(Some(_)) => Ok(ApiResponse::no_content()),
        Ok(None) => Err(ApiResponse::new(
            StatusCode::NOT_FOUND,
            "Something was wrong: ID doesnt match with a valid admin!",
        )
        .error(true)),
        Err(e) => Err(failure(StatusCode::NOT_FOUND, "Something was wrong", e)),
    }
}
