use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ApiError;

/// Uniform JSON body: `{ message, data?, error? }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
}

/// Status code plus envelope. 204 responses carry no body.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Option<Envelope>,
    serialization_error: Option<String>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(Envelope {
                message: message.into(),
                data: None,
                error: None,
            }),
            serialization_error: None,
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, message)
    }

    pub fn created(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CREATED, message)
    }

    /// Create a 204 No Content response
    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: None,
            serialization_error: None,
        }
    }

    /// Attach a payload under `data`.
    pub fn data<T: Serialize>(mut self, data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => {
                if let Some(body) = self.body.as_mut() {
                    body.data = Some(value);
                }
            }
            Err(e) => self.serialization_error = Some(e.to_string()),
        }
        self
    }

    /// Set the `error` flag.
    pub fn error(mut self, flag: bool) -> Self {
        if let Some(body) = self.body.as_mut() {
            body.error = Some(flag);
        }
        self
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        if let Some(e) = self.serialization_error {
            tracing::error!("Failed to serialize response data: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "message": "Failed to serialize response data",
                    "error": true
                })),
            )
                .into_response();
        }

        match self.body {
            // For 204 No Content, return empty response
            None => self.status.into_response(),
            Some(body) => (self.status, Json(body)).into_response(),
        }
    }
}

impl From<ApiError> for ApiResponse {
    fn from(err: ApiError) -> Self {
        ApiResponse::new(err.status_code(), err.message()).error(true)
    }
}

/// Handlers return the failure response on the error side so `?` short-circuits.
pub type HandlerResult = Result<ApiResponse, ApiResponse>;
