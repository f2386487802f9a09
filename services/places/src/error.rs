//! Custom error types for the places service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the places service
///
/// Every variant maps to a terminal HTTP response with a client-safe
/// message; underlying causes are logged where they are detected and
/// never forwarded to the client.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, malformed, or expired credential
    #[error("Authentication failed!")]
    Unauthorized,

    /// Unknown email or wrong password, collapsed into one error so the
    /// response does not reveal which accounts exist
    #[error("Invalid credentials.")]
    InvalidCredentials,

    /// Valid credential, but the caller does not own the resource
    #[error("{0}")]
    Forbidden(String),

    /// Unknown id, or owner with zero places
    #[error("{0}")]
    NotFound(String),

    /// Malformed request with message
    #[error("{0}")]
    BadRequest(String),

    /// Validation failure, duplicate email, or unresolvable address
    #[error("{0}")]
    UnprocessableEntity(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Authentication failed!".to_string())
            }
            ApiError::InvalidCredentials => (StatusCode::FORBIDDEN, "Invalid credentials.".to_string()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong, please try again.".to_string(),
            ),
        };

        let body = Json(json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for handler results
pub type ApiResult<T> = Result<T, ApiError>;
