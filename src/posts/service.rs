use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::types::Vote;
use crate::records::RecordService;
use crate::session::AuthenticatedUser;
use crate::shared::AppError;
use crate::store::{Collection, Document, DocumentStore, InsertOneResult, UpdateResult, ID_FIELD};

/// Field on a post holding its author's email
pub const AUTHOR_FIELD: &str = "authorEmail";

/// Service for forum posts
pub struct PostService {
    store: Arc<dyn DocumentStore + Send + Sync>,
    records: RecordService,
}

impl PostService {
    pub fn new(store: Arc<dyn DocumentStore + Send + Sync>) -> Self {
        let records = RecordService::new(Arc::clone(&store), Collection::Posts);
        Self { store, records }
    }

    pub async fn create_post(
        &self,
        post: Document,
        author: &AuthenticatedUser,
    ) -> Result<InsertOneResult, AppError> {
        self.records.create(post, author).await
    }

    pub async fn list_posts(&self) -> Result<Vec<Document>, AppError> {
        self.records.list().await
    }

    #[instrument(skip(self))]
    pub async fn get_post(&self, id: &str) -> Result<Option<Document>, AppError> {
        let mut filter = Document::new();
        filter.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        self.store.find_one(Collection::Posts, &filter).await
    }

    /// Posts written by `author_email`; no email means no posts
    #[instrument(skip(self))]
    pub async fn posts_by_author(&self, author_email: Option<&str>) -> Result<Vec<Document>, AppError> {
        let Some(author_email) = author_email else {
            debug!("No author email supplied, returning no posts");
            return Ok(Vec::new());
        };

        let mut filter = Document::new();
        filter.insert(
            AUTHOR_FIELD.to_string(),
            Value::String(author_email.to_string()),
        );
        self.store.find(Collection::Posts, &filter).await
    }

    /// Bumps the post's up- or down-vote counter by one
    #[instrument(skip(self))]
    pub async fn vote(&self, id: &str, vote: Vote) -> Result<UpdateResult, AppError> {
        let found = self
            .store
            .increment(Collection::Posts, id, vote.counter_field(), 1)
            .await?;

        if !found {
            warn!(post_id = %id, "Vote on unknown post");
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        info!(post_id = %id, ?vote, "Vote recorded");
        Ok(UpdateResult::matched(true))
    }
}
