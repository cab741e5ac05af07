use std::sync::Arc;
use tracing::{info, instrument};

use crate::session::AuthenticatedUser;
use crate::shared::AppError;
use crate::store::{Collection, Document, DocumentStore, InsertOneResult};

/// Create/list access to one collection of caller-defined records.
/// Posts, tags and announcements are all stored as submitted.
pub struct RecordService {
    store: Arc<dyn DocumentStore + Send + Sync>,
    collection: Collection,
}

impl RecordService {
    pub fn new(store: Arc<dyn DocumentStore + Send + Sync>, collection: Collection) -> Self {
        Self { store, collection }
    }

    #[instrument(skip(self, record, author), fields(collection = %self.collection))]
    pub async fn create(
        &self,
        record: Document,
        author: &AuthenticatedUser,
    ) -> Result<InsertOneResult, AppError> {
        let result = self.store.insert_one(self.collection, record).await?;

        info!(
            id = %result.inserted_id,
            created_by = author.0.email().unwrap_or("<none>"),
            "Record created"
        );
        Ok(result)
    }

    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn list(&self) -> Result<Vec<Document>, AppError> {
        self.store.find(self.collection, &Document::new()).await
    }
}
