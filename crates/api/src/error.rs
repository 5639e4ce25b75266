//! API error handling
//!
//! Consistent JSON error responses across all endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use github::ClientError;
use processor::LoadError;
use serde::Serialize;
use tracing::error;

const INVALID_TOKEN: &str =
    "Invalid token. Check that the token is correct and has the required permissions.";

/// Structured JSON error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error type that converts to JSON responses
#[derive(Debug)]
pub enum ApiError {
    /// Missing, malformed or rejected token
    Unauthorized(String),
    /// Bad query or path parameters
    BadRequest(String),
    /// Resource not found
    NotFound(String),
    /// Upstream fetch failed, aborting the load
    GitHub(String),
    /// Metrics store failure
    Database(String),
}

impl ApiError {
    pub fn invalid_token() -> Self {
        ApiError::Unauthorized(INVALID_TOKEN.to_string())
    }
}

impl From<ClientError> for ApiError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Unauthorized => ApiError::invalid_token(),
            ClientError::NotFound(what) => ApiError::NotFound(format!("Not found: {}", what)),
            other => ApiError::GitHub(format!("Failed to load data: {}", other)),
        }
    }
}

impl From<common::Error> for ApiError {
    fn from(e: common::Error) -> Self {
        match e {
            common::Error::InvalidRange(_) => ApiError::BadRequest(e.to_string()),
            common::Error::Database(_) => ApiError::Database(e.to_string()),
        }
    }
}

impl From<LoadError> for ApiError {
    fn from(e: LoadError) -> Self {
        match e {
            LoadError::GitHub(inner) => inner.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::GitHub(msg) => {
                error!("GitHub API error: {}", msg);
                (StatusCode::BAD_GATEWAY, "github_error", msg)
            }
            ApiError::Database(msg) => {
                error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "Failed to load AI metrics".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code: Some(code.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Extension trait to convert Option to NotFound
pub trait OptionExt<T> {
    fn not_found(self, resource: impl Into<String>) -> Result<T, ApiError>;
}

impl<T> OptionExt<T> for Option<T> {
    fn not_found(self, resource: impl Into<String>) -> Result<T, ApiError> {
        self.ok_or_else(|| ApiError::NotFound(resource.into()))
    }
}
