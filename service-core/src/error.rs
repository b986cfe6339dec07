use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Error taxonomy shared by every handler.
///
/// Each variant carries enough context for the log line; the HTTP mapping
/// lives in a single place in [`IntoResponse`] so handlers never pick status
/// codes themselves.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(anyhow::Error),

    #[error("{0}")]
    NotFound(anyhow::Error),

    #[error("{0}")]
    Forbidden(anyhow::Error),

    #[error("{0}")]
    Conflict(anyhow::Error),

    #[error("Invalid invitation token")]
    InvalidToken,

    #[error("Invitation has expired")]
    ExpiredToken,

    #[error("Storage error: {0}")]
    Storage(anyhow::Error),

    #[error("Hashing error: {0}")]
    Hashing(anyhow::Error),

    #[error("Email error: {0}")]
    Email(String),

    #[error("Configuration error: {0}")]
    Config(anyhow::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        let (status, error_message) = match self {
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::BadRequest(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            AppError::Forbidden(err) => (StatusCode::FORBIDDEN, err.to_string()),
            // the admin frontend treats duplicate-name rejections as plain
            // bad requests, same as missing fields
            AppError::Conflict(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::InvalidToken => (
                StatusCode::BAD_REQUEST,
                "Invalid invitation token".to_string(),
            ),
            AppError::ExpiredToken => (
                StatusCode::BAD_REQUEST,
                "Invitation has expired".to_string(),
            ),
            AppError::Storage(err) => {
                tracing::error!(error = %err, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error".to_string(),
                )
            }
            AppError::Hashing(err) => {
                tracing::error!(error = %err, "password hashing failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Hashing error".to_string(),
                )
            }
            AppError::Email(msg) => {
                tracing::error!(error = %msg, "mail failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Email error".to_string())
            }
            AppError::Config(err) => {
                tracing::error!(error = %err, "configuration failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "unhandled internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error_message,
            }),
        )
            .into_response()
    }
}
