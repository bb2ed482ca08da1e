use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use logbook_core::DomainError;

use crate::app::services::ServiceError;

/// Error returned by handlers. Bodies carry a plain message, no error codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 400 `{"error": msg}`
    BadRequest(String),
    /// 404 `{"message": msg}`
    NotFound(String),
    /// 409 `{"error": msg}`
    Conflict(String),
    /// 500 `{"error": msg, "details"?: ..}`
    Internal {
        message: &'static str,
        details: Option<String>,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => json_error(StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => json_error(StatusCode::CONFLICT, msg),
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, axum::Json(json!({ "message": msg }))).into_response()
            }
            ApiError::Internal { message, details: None } => {
                json_error(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            ApiError::Internal {
                message,
                details: Some(details),
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(json!({ "error": message, "details": details })),
            )
                .into_response(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => ApiError::BadRequest(msg),
        }
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

/// Map a service failure; internal failures become `message` with no details.
pub fn service_error(err: ServiceError, message: &'static str) -> ApiError {
    map_service_error(err, message, false)
}

/// Like [`service_error`], but internal failures also expose `details`.
pub fn service_error_with_details(err: ServiceError, message: &'static str) -> ApiError {
    map_service_error(err, message, true)
}

fn map_service_error(err: ServiceError, message: &'static str, with_details: bool) -> ApiError {
    match err {
        ServiceError::Validation(msg) => ApiError::BadRequest(msg),
        ServiceError::UserNotFound => ApiError::BadRequest("User not found".to_string()),
        ServiceError::InvalidPassword => ApiError::BadRequest("Invalid password".to_string()),
        ServiceError::DuplicateUser(_) => ApiError::Conflict("User already exists".to_string()),
        ServiceError::NoLogs => ApiError::NotFound("No logs found".to_string()),
        internal @ (ServiceError::Hashing(_) | ServiceError::Token(_) | ServiceError::Storage(_)) => {
            tracing::error!(error = %internal, "{message}");
            ApiError::Internal {
                message,
                details: with_details.then(|| internal.to_string()),
            }
        }
    }
}
