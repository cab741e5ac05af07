use axum::{extract::State, Extension, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::records::RecordService;
use crate::session::AuthenticatedUser;
use crate::shared::{AppError, AppState};
use crate::store::{Collection, Document, InsertOneResult};

/// HTTP handler for publishing an announcement (session required)
///
/// POST /announcements
#[instrument(name = "create_announcement", skip(state, user, announcement))]
pub async fn create_announcement(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(announcement): Json<Document>,
) -> Result<Json<InsertOneResult>, AppError> {
    let service = RecordService::new(Arc::clone(&state.store), Collection::Announcements);
    Ok(Json(service.create(announcement, &user).await?))
}

/// GET /announcements
#[instrument(name = "list_announcements", skip(state))]
pub async fn list_announcements(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, AppError> {
    let service = RecordService::new(Arc::clone(&state.store), Collection::Announcements);
    let announcements = service.list().await?;

    info!(
        announcement_count = announcements.len(),
        "Announcements listed successfully"
    );
    Ok(Json(announcements))
}
