use axum::{extract::State, Extension, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::records::RecordService;
use crate::session::AuthenticatedUser;
use crate::shared::{AppError, AppState};
use crate::store::{Collection, Document, InsertOneResult};

/// HTTP handler for creating a tag (session required)
///
/// POST /tags
#[instrument(name = "create_tag", skip(state, user, tag))]
pub async fn create_tag(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(tag): Json<Document>,
) -> Result<Json<InsertOneResult>, AppError> {
    let service = RecordService::new(Arc::clone(&state.store), Collection::Tags);
    Ok(Json(service.create(tag, &user).await?))
}

/// HTTP handler for listing all tags
///
/// GET /tags
#[instrument(name = "list_tags", skip(state))]
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Document>>, AppError> {
    let service = RecordService::new(Arc::clone(&state.store), Collection::Tags);
    let tags = service.list().await?;

    info!(tag_count = tags.len(), "Tags listed successfully");
    Ok(Json(tags))
}
