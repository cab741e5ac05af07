use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{service::UserService, types::UpsertUserResponse};
use crate::shared::{AppError, AppState};
use crate::store::Document;

/// HTTP handler for saving a user profile
///
/// PUT /users/:email
#[instrument(name = "upsert_user", skip(state, user))]
pub async fn upsert_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(user): Json<Document>,
) -> Result<Json<UpsertUserResponse>, AppError> {
    let service = UserService::new(Arc::clone(&state.store));
    let response = service.upsert_user(&email, user).await?;

    Ok(Json(response))
}

/// HTTP handler for listing all users
///
/// GET /users
#[instrument(name = "list_users", skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<Document>>, AppError> {
    let service = UserService::new(Arc::clone(&state.store));
    let users = service.list_users().await?;

    info!(user_count = users.len(), "Users listed successfully");
    Ok(Json(users))
}

/// HTTP handler for a single user profile
///
/// GET /users/:email
/// Responds with `null` when no user has that email
#[instrument(name = "get_user", skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Option<Document>>, AppError> {
    let service = UserService::new(Arc::clone(&state.store));
    let user = service.get_user(&email).await?;

    Ok(Json(user))
}
