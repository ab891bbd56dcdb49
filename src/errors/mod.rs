//! Error handling module for the Schola backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const ALUMNI_NOT_FOUND: &str = "ALUMNI_NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const STORAGE_UNAVAILABLE: &str = "STORAGE_UNAVAILABLE";
    pub const STORAGE_QUOTA_EXCEEDED: &str = "STORAGE_QUOTA_EXCEEDED";
    pub const DRAFT_UNAVAILABLE: &str = "DRAFT_UNAVAILABLE";
    pub const DRAFT_FAILED: &str = "DRAFT_FAILED";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
}

/// Message shown for every failed alumni identification.
pub const ALUMNI_NOT_FOUND_MESSAGE: &str =
    "Alumni record not found. Please ensure your name and class year match our records.";

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Missing, expired or invalid admin session
    Unauthorized(String),
    /// Resource not found
    NotFound(String),
    /// Alumni identity check failed; carries no detail on purpose
    AlumniNotFound,
    /// Validation error
    Validation(String),
    /// Persistent store could not be read or written
    StorageUnavailable(String),
    /// Persistent store refused the write for lack of space
    StorageQuotaExceeded(String),
    /// Draft generation is not configured
    DraftUnavailable,
    /// Draft generation was attempted and failed
    DraftFailed(String),
    /// Internal server error
    Internal(String),
    /// Bad request
    BadRequest(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlumniNotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::StorageQuotaExceeded(_) => StatusCode::INSUFFICIENT_STORAGE,
            AppError::DraftUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DraftFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::AlumniNotFound => codes::ALUMNI_NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::StorageUnavailable(_) => codes::STORAGE_UNAVAILABLE,
            AppError::StorageQuotaExceeded(_) => codes::STORAGE_QUOTA_EXCEEDED,
            AppError::DraftUnavailable => codes::DRAFT_UNAVAILABLE,
            AppError::DraftFailed(_) => codes::DRAFT_FAILED,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::AlumniNotFound => ALUMNI_NOT_FOUND_MESSAGE.to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::StorageUnavailable(msg) => msg.clone(),
            AppError::StorageQuotaExceeded(msg) => msg.clone(),
            AppError::DraftUnavailable => "AI Service not configured".to_string(),
            AppError::DraftFailed(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

/// SQLite result code for "database or disk is full".
const SQLITE_FULL: &str = "13";

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Storage error: {:?}", err);
        match &err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(SQLITE_FULL) => {
                AppError::StorageQuotaExceeded(format!("Storage quota exceeded: {}", err))
            }
            _ => AppError::StorageUnavailable(format!("Storage unavailable: {}", err)),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::warn!("Draft request error: {:?}", err);
        AppError::DraftFailed("Failed to generate draft.".to_string())
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
                details: None,
            },
        }
    }

    /// Attach structured details, e.g. rejected CSV lines.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = Some(details);
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alumni_not_found_is_generic() {
        let err = AppError::AlumniNotFound;
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), codes::ALUMNI_NOT_FOUND);
        assert_eq!(err.message(), ALUMNI_NOT_FOUND_MESSAGE);
    }

    #[test]
    fn test_storage_errors_are_distinguishable() {
        let unavailable = AppError::StorageUnavailable("down".to_string());
        let quota = AppError::StorageQuotaExceeded("full".to_string());
        assert_eq!(unavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(quota.status_code(), StatusCode::INSUFFICIENT_STORAGE);
        assert_ne!(unavailable.error_code(), quota.error_code());
    }

    #[test]
    fn test_pool_timeout_maps_to_unavailable() {
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err.error_code(), codes::STORAGE_UNAVAILABLE);
    }

    #[test]
    fn test_body_rejection_is_bad_request() {
        let err: AppError = JsonRejection::MissingJsonContentType(Default::default()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), codes::BAD_REQUEST);
    }
}
