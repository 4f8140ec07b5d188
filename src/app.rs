use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderValue,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::{DocumentStore, Repository};
use crate::error::ApiError;
use crate::handlers;
use crate::model::Entity;
use crate::services::PopulateService;

/// Shared request state: the document store behind every repository.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn repository<T: Entity>(&self) -> Repository<T> {
        Repository::new(self.store.clone())
    }

    pub fn populate(&self) -> PopulateService {
        PopulateService::new(self.store.clone())
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Resources
        .merge(admin_routes())
        .merge(employee_routes())
        .merge(project_routes())
        .merge(task_routes())
        .merge(timesheet_routes())
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    let router = if config.security.enable_cors {
        router.layer(cors_layer(&config.security.cors_origins))
    } else {
        router
    };

    if config.api.enable_request_logging {
        router.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    } else {
        router
    }
}

fn admin_routes() -> Router<AppState> {
    use handlers::admins;

    Router::new()
        .route("/api/admins", get(admins::list).post(admins::create))
        .route(
            "/api/admins/:id",
            get(admins::get).put(admins::update).delete(admins::delete),
        )
}

fn employee_routes() -> Router<AppState> {
    use handlers::employees;

    Router::new()
        .route("/api/employees", get(employees::list).post(employees::create))
        .route(
            "/api/employees/:id",
            get(employees::get).put(employees::update).delete(employees::delete),
        )
}

fn project_routes() -> Router<AppState> {
    use handlers::projects;

    Router::new()
        .route("/api/projects", get(projects::list).post(projects::create))
        .route("/api/projects/withDeleted", get(projects::list_with_deleted))
        .route("/api/projects/byEmployee/:id", get(projects::by_employee))
        .route(
            "/api/projects/:id",
            get(projects::get).put(projects::update).delete(projects::delete),
        )
}

fn task_routes() -> Router<AppState> {
    use handlers::tasks;

    Router::new()
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route(
            "/api/tasks/:id",
            get(tasks::get).put(tasks::update).delete(tasks::delete),
        )
}

fn timesheet_routes() -> Router<AppState> {
    use handlers::timesheets;

    Router::new()
        .route("/api/timesheets", get(timesheets::list).post(timesheets::create))
        .route("/api/timesheets/withDeleted", get(timesheets::list_with_deleted))
        .route("/api/timesheets/byEmployee/:id", get(timesheets::by_employee))
        .route(
            "/api/timesheets/:id",
            get(timesheets::get).put(timesheets::update).delete(timesheets::delete),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    CorsLayer::new().allow_origin(allowed).allow_methods(Any).allow_headers(Any)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "message": "HR Tracker API",
        "data": {
            "name": "HR Tracker API",
            "version": version,
            "endpoints": {
                "admins": "/api/admins[/:id]",
                "employees": "/api/employees[/:id]",
                "projects": "/api/projects[/:id | /withDeleted | /byEmployee/:id]",
                "tasks": "/api/tasks[/:id]",
                "timesheets": "/api/timesheets[/:id | /withDeleted | /byEmployee/:id]",
                "health": "/health",
            }
        },
        "error": false
    }))
}

async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let now = chrono::Utc::now();
    state.store.ping().await?;

    Ok(Json(json!({
        "message": "ok",
        "data": {
            "status": "ok",
            "timestamp": now,
            "store": state.store.backend()
        },
        "error": false
    })))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
