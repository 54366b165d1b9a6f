//! Error types for the catalog server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// PostgreSQL SQLSTATE for foreign key violations
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// PostgreSQL SQLSTATE for unique violations
const UNIQUE_VIOLATION: &str = "23505";

/// Stable error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NoSuchData = 2,
    BadValue = 3,
    ConstraintViolation = 4,
    DbFailure = 5,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// SQLSTATE of a foreign key or unique violation, if that is what the store reported
fn constraint_code(e: &sqlx::Error) -> Option<&'static str> {
    let db_error = e.as_database_error()?;
    match db_error.code().as_deref() {
        Some(FOREIGN_KEY_VIOLATION) => Some(FOREIGN_KEY_VIOLATION),
        Some(UNIQUE_VIOLATION) => Some(UNIQUE_VIOLATION),
        _ => None,
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone()),
            AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, ErrorCode::ConstraintViolation, msg.clone())
            }
            AppError::Database(e) => match constraint_code(e) {
                Some(FOREIGN_KEY_VIOLATION) => {
                    tracing::warn!("Foreign key violation: {}", e);
                    (
                        StatusCode::CONFLICT,
                        ErrorCode::ConstraintViolation,
                        "Referenced record is missing or still in use".to_string(),
                    )
                }
                Some(_) => {
                    tracing::warn!("Unique violation: {}", e);
                    (
                        StatusCode::CONFLICT,
                        ErrorCode::ConstraintViolation,
                        "Record already exists".to_string(),
                    )
                }
                None => {
                    tracing::error!("Database error: {:?}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::DbFailure,
                        "Database error".to_string(),
                    )
                }
            },
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::NotFound("Book 1 not found".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("title".into()), StatusCode::BAD_REQUEST),
            (AppError::Conflict("in use".into()), StatusCode::CONFLICT),
            (AppError::Database(sqlx::Error::RowNotFound), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_non_database_errors_carry_no_constraint_code() {
        assert_eq!(constraint_code(&sqlx::Error::PoolTimedOut), None);
        assert_eq!(constraint_code(&sqlx::Error::RowNotFound), None);
    }

    #[tokio::test]
    async fn test_body_carries_code_and_message() {
        let response = AppError::NotFound("Book 7 not found".into()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code, ErrorCode::NoSuchData as u32);
        assert_eq!(body.error, "NoSuchData");
        assert_eq!(body.message, "Book 7 not found");
    }
}
