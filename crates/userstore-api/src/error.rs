use std::time::Duration;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::validation::ValidationErrors;

/// Failure of a record store call
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("record store call timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure of a cache store call
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("cache store call timed out after {0:?}")]
    Timeout(Duration),
    #[error("failed to encode cache entry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors raised by the user accessor and the cache-aside lookup
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("invalid user data: {0}")]
    Validation(ValidationErrors),
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),
    #[error("user {0} not found")]
    NotFound(String),
    #[error("store write failed: {0}")]
    StoreWrite(#[source] StoreError),
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),
    #[error("cache write failed: {0}")]
    CacheWrite(#[source] CacheError),
}

/// Errors that abort process startup
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("timed out connecting to the database after {0:?}")]
    ConnectTimeout(Duration),
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tracing_subscriber::filter::ParseError> for StartupError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        StartupError::Config(err.to_string())
    }
}

/// Application error type that converts to HTTP responses
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Unauthorized,
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unauthorized => {
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, r#"Basic realm="Restricted""#)],
                    axum::Json(json!({ "error": "Unauthorized" })),
                )
                    .into_response();
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

impl From<AccessError> for AppError {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::Validation(errors) => {
                AppError::BadRequest(format!("Invalid user data: {errors}"))
            }
            AccessError::InvalidIdentifier(_) => AppError::BadRequest("Invalid user id".into()),
            AccessError::NotFound(_) => AppError::NotFound("User not found".into()),
            e @ (AccessError::StoreWrite(_)
            | AccessError::StoreUnavailable(_)
            | AccessError::CacheWrite(_)) => AppError::Internal(e.to_string()),
        }
    }
}
