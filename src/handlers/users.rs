// src/handlers/users.rs

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{error::AppError, models::user::CreateUserRequest, storage::UserRegistry};

/// Registers a participant.
///
/// Returns 201 Created and the stored user, including its generated `user_id`.
/// Identical names or emails are accepted; every call creates a new record.
pub async fn register(
    State(registry): State<Arc<UserRegistry>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = registry.register(payload).await.map_err(|e| {
        tracing::error!("Failed to register user: {}", e);
        AppError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(user)))
}
