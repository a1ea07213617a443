use axum::extract::OriginalUri;
use axum::http::Method;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::AppError;

/// Greeting behind basic auth
pub async fn index(user: AuthUser) -> &'static str {
    info!(user = %user.username, "Received / request");
    "Hello, World 👋!"
}

/// Fallback for unknown routes
pub async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(format!("Cannot {} {}", method, uri.path()))
}
