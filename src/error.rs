//! Error types for the mailtrack server
//!
//! All errors use thiserror for structured error handling. Domain errors
//! are translated to HTTP responses at the API boundary; every error body
//! is a `{"error": message}` JSON object.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or missing input (HTTP 400)
    #[error("{0}")]
    Validation(String),

    /// A referenced id or name is absent (HTTP 404)
    #[error("{0}")]
    NotFound(String),

    /// Duplicate name or in-use deletion target (HTTP 409)
    #[error("{0}")]
    Conflict(String),
}

impl AppError {
    /// Map a sqlx error, turning a UNIQUE violation into the given domain
    /// conflict. Used by the repository wherever a name column is unique.
    pub fn or_conflict(err: sqlx::Error, message: impl Into<String>) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(message.into())
            }
            _ => AppError::Database(err),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Storage/IO details stay in the log, not in the response body.
        let message = match self {
            AppError::Database(e) => {
                tracing::error!("database error: {}", e);
                "internal server error".to_string()
            }
            AppError::Io(e) => {
                tracing::error!("io error: {}", e);
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": message }))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
