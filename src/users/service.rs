use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::types::UpsertUserResponse;
use crate::shared::AppError;
use crate::store::{Collection, Document, DocumentStore};

/// Service for user profile lookups and first-login registration
pub struct UserService {
    store: Arc<dyn DocumentStore + Send + Sync>,
}

fn email_filter(email: &str) -> Document {
    let mut filter = Document::new();
    filter.insert("email".to_string(), Value::String(email.to_string()));
    filter
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// Saves a user the first time their email is seen.
    ///
    /// An existing profile is returned untouched; otherwise the submitted
    /// fields plus a `timestamp` (epoch millis) are upserted under the email.
    #[instrument(skip(self, user))]
    pub async fn upsert_user(
        &self,
        email: &str,
        mut user: Document,
    ) -> Result<UpsertUserResponse, AppError> {
        let filter = email_filter(email);

        if let Some(existing) = self.store.find_one(Collection::Users, &filter).await? {
            debug!(email = %email, "User already exists, returning stored profile");
            return Ok(UpsertUserResponse::Existing(existing));
        }

        user.insert(
            "timestamp".to_string(),
            Value::from(Utc::now().timestamp_millis()),
        );
        let result = self
            .store
            .update_one(Collection::Users, &filter, user, true)
            .await?;

        info!(email = %email, upserted = result.upserted_count, "User saved");
        Ok(UpsertUserResponse::Saved(result))
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<Document>, AppError> {
        self.store.find(Collection::Users, &Document::new()).await
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, email: &str) -> Result<Option<Document>, AppError> {
        self.store
            .find_one(Collection::Users, &email_filter(email))
            .await
    }
}
