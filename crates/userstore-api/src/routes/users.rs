use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::model::{CreatedResponse, DeletedResponse, UpdatedResponse, UserFields};
use crate::state::AppState;

fn parse_body(payload: Result<Json<UserFields>, JsonRejection>) -> Result<UserFields, AppError> {
    payload
        .map(|Json(fields)| fields)
        .map_err(|e| AppError::BadRequest(format!("Error parsing body: {}", e.body_text())))
}

pub async fn count(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let count = state.users.count().await?;
    Ok(Json(json!({ "count": count })))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<UserFields>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let fields = parse_body(payload)?;
    let inserted = state.users.create(&fields).await?;
    Ok((StatusCode::CREATED, Json(inserted.into())))
}

/// Cache-aside read; `X-Cache` tells whether the cache answered
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let lookup = state.lookup.get_with_cache(&id).await?;
    Ok((
        [("x-cache", lookup.status.as_header_value())],
        Json(lookup.user),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserFields>, JsonRejection>,
) -> Result<Json<UpdatedResponse>, AppError> {
    let fields = parse_body(payload)?;
    let counts = state.users.update(&id, &fields).await?;
    state.lookup.after_write(&id).await;
    Ok(Json(counts.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    let deleted_count = state.users.delete(&id).await?;
    state.lookup.after_write(&id).await;
    Ok(Json(DeletedResponse { deleted_count }))
}
