use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::ModelError;
use service::errors::{ErrorKind, ServiceError};
use thiserror::Error;
use tracing::error;

/// JSON error body: `{"statusCode", "error", "message"}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, message: Option<String>) -> Self {
        Self { status, error, message }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(message.into()))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(message.into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let message = self.message.unwrap_or_else(|| self.error.to_string());
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), error = self.error, %message, "request failed");
        }
        let body = serde_json::json!({
            "statusCode": self.status.as_u16(),
            "error": self.error,
            "message": message,
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let status = match e.kind() {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let error = status.canonical_reason().unwrap_or("Error");
        let message = match e {
            ServiceError::Validation { message, .. } => message,
            ServiceError::NotFound(message) => message,
            ServiceError::Model(ModelError::Validation(message)) => message,
            ServiceError::Storage(detail) | ServiceError::Model(ModelError::Db(detail)) => {
                error!(%detail, "storage failure");
                "storage failure".to_string()
            }
        };
        Self::new(status, error, Some(message))
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("migration failed: {0}")]
    Migration(String),
}
