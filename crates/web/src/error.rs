use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use storage::{dto::competition::FieldError, error::StorageError};

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Validation(Vec<FieldError>),
    BadRequest(String),
    NotFound,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {} field(s)", e.len()),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::NotFound => write!(f, "Resource not found"),
        }
    }
}

impl WebError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Storage(StorageError::HasDependents { .. }) => StatusCode::CONFLICT,
            Self::Storage(StorageError::ConstraintViolation(_)) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let body = match &self {
            Self::Storage(e @ StorageError::HasDependents { .. }) => {
                json!({
                    "error": e.to_string()
                })
            }
            Self::Storage(StorageError::ConstraintViolation(msg)) => {
                json!({
                    "error": msg
                })
            }
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                json!({
                    "error": "An internal error occurred"
                })
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();

                json!({
                    "error": "Validation failed",
                    "details": field_errors
                })
            }
            Self::BadRequest(msg) => {
                json!({
                    "error": msg
                })
            }
            Self::NotFound => {
                json!({
                    "error": "Resource not found"
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<Vec<FieldError>> for WebError {
    fn from(errors: Vec<FieldError>) -> Self {
        Self::Validation(errors)
    }
}

pub type WebResult<T> = Result<T, WebError>;
