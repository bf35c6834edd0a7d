//! User record endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::Value;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, DataResponse, Json, ListResponse, MessageResponse};
use crate::domain::user::User;

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<User>>, ApiError> {
    debug!("Listing users");

    let users = state.user_service.list().await?;

    Ok(Json(ListResponse::new(users)))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<DataResponse<User>>, ApiError> {
    debug!(user_id = %user_id, "Getting user");

    let user = state.user_service.get(&user_id).await?;

    Ok(Json(DataResponse::new("User fetched successfully", user)))
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<DataResponse<User>>), ApiError> {
    debug!("Creating user");

    let user = state.user_service.create(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new("User created successfully", user)),
    ))
}

/// PATCH /api/v1/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(patch): Json<Value>,
) -> Result<Json<DataResponse<User>>, ApiError> {
    debug!(user_id = %user_id, "Updating user");

    let user = state
        .user_service
        .update(&user_id, &patch)
        .await
        .map_err(ApiError::from_update_error)?;

    Ok(Json(DataResponse::new("User updated successfully", user)))
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    debug!(user_id = %user_id, "Deleting user");

    state.user_service.delete(&user_id).await?;

    Ok(Json(MessageResponse::new("User deleted successfully")))
}
