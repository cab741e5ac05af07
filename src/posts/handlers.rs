use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::PostService,
    types::{MyPostsQuery, Vote},
};
use crate::session::AuthenticatedUser;
use crate::shared::{AppError, AppState};
use crate::store::{Document, InsertOneResult, UpdateResult};

/// HTTP handler for creating a post (session required)
///
/// POST /posts
#[instrument(name = "create_post", skip(state, user, post))]
pub async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(post): Json<Document>,
) -> Result<Json<InsertOneResult>, AppError> {
    let service = PostService::new(Arc::clone(&state.store));
    let result = service.create_post(post, &user).await?;

    Ok(Json(result))
}

/// HTTP handler for listing all posts
///
/// GET /posts
#[instrument(name = "list_posts", skip(state))]
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Document>>, AppError> {
    let service = PostService::new(Arc::clone(&state.store));
    let posts = service.list_posts().await?;

    info!(post_count = posts.len(), "Posts listed successfully");
    Ok(Json(posts))
}

/// HTTP handler for a single post, `null` if absent
///
/// GET /posts/:id
#[instrument(name = "get_post", skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Document>>, AppError> {
    let service = PostService::new(Arc::clone(&state.store));
    Ok(Json(service.get_post(&id).await?))
}

/// HTTP handler for one author's posts
///
/// GET /my-posts?userEmail=
#[instrument(name = "my_posts", skip(state))]
pub async fn my_posts(
    State(state): State<AppState>,
    Query(query): Query<MyPostsQuery>,
) -> Result<Json<Vec<Document>>, AppError> {
    let service = PostService::new(Arc::clone(&state.store));
    let posts = service.posts_by_author(query.user_email.as_deref()).await?;

    info!(post_count = posts.len(), "Author posts listed successfully");
    Ok(Json(posts))
}

/// PATCH /posts/:id/upvote
#[instrument(name = "upvote_post", skip(state))]
pub async fn upvote_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>, AppError> {
    let service = PostService::new(Arc::clone(&state.store));
    Ok(Json(service.vote(&id, Vote::Up).await?))
}

/// PATCH /posts/:id/downvote
#[instrument(name = "downvote_post", skip(state))]
pub async fn downvote_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>, AppError> {
    let service = PostService::new(Arc::clone(&state.store));
    Ok(Json(service.vote(&id, Vote::Down).await?))
}
