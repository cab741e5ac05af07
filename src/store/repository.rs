use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool, Row};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

use super::models::{
    ensure_id, incremented_counter, matches_filter, Collection, Document, InsertOneResult,
    UpdateResult, ID_FIELD,
};
use crate::shared::AppError;

/// Trait for document store operations.
///
/// Filters are plain equality matches on top-level fields; an empty filter
/// matches every document in the collection.
#[async_trait]
pub trait DocumentStore {
    async fn find(&self, collection: Collection, filter: &Document)
        -> Result<Vec<Document>, AppError>;
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Document,
    ) -> Result<Option<Document>, AppError>;
    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertOneResult, AppError>;

    /// Merges `set` into the first matching document. With `upsert`, a miss
    /// inserts `filter` merged with `set` as a new document.
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Document,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateResult, AppError>;

    /// Adds `by` to a numeric field of the document with the given `_id`,
    /// treating a missing field as zero. Returns false when no document matched.
    /// A non-numeric or overflowing counter is an error and leaves the document as is.
    async fn increment(
        &self,
        collection: Collection,
        id: &str,
        field: &str,
        by: i64,
    ) -> Result<bool, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
    async fn close(&self);
}

/// In-memory implementation of DocumentStore for development and testing
///
/// Data is stored in memory and will be lost when the application restarts.
/// Documents keep their insertion order within a collection.
pub struct InMemoryDocumentStore {
    collections: Mutex<HashMap<Collection, Vec<Document>>>,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentStore {
    /// Creates a new empty in-memory store
    pub fn new() -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the current number of documents in a collection
    pub fn count(&self, collection: Collection) -> usize {
        self.lock()
            .map(|collections| collections.get(&collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Collection, Vec<Document>>>, AppError> {
        self.collections.lock().map_err(|_| {
            warn!("In-memory document store lock poisoned");
            AppError::Internal
        })
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    #[instrument(skip(self, filter))]
    async fn find(
        &self,
        collection: Collection,
        filter: &Document,
    ) -> Result<Vec<Document>, AppError> {
        let collections = self.lock()?;
        let documents: Vec<Document> = collections
            .get(&collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| matches_filter(document, filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        debug!(count = documents.len(), "Documents found in memory");
        Ok(documents)
    }

    #[instrument(skip(self, filter))]
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Document,
    ) -> Result<Option<Document>, AppError> {
        let collections = self.lock()?;
        let document = collections.get(&collection).and_then(|documents| {
            documents
                .iter()
                .find(|document| matches_filter(document, filter))
                .cloned()
        });

        debug!(found = document.is_some(), "Single document lookup in memory");
        Ok(document)
    }

    #[instrument(skip(self, document))]
    async fn insert_one(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> Result<InsertOneResult, AppError> {
        let id = ensure_id(&mut document)?;

        let mut collections = self.lock()?;
        let documents = collections.entry(collection).or_default();
        if documents
            .iter()
            .any(|existing| existing.get(ID_FIELD).and_then(Value::as_str) == Some(id.as_str()))
        {
            warn!(id = %id, "Document already exists in memory");
            return Err(AppError::DatabaseError(format!(
                "duplicate {} in {}",
                ID_FIELD, collection
            )));
        }
        documents.push(document);

        debug!(id = %id, "Document inserted in memory");
        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    #[instrument(skip(self, filter, set))]
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Document,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateResult, AppError> {
        let mut collections = self.lock()?;
        let documents = collections.entry(collection).or_default();

        if let Some(existing) = documents
            .iter_mut()
            .find(|document| matches_filter(document, filter))
        {
            let before = existing.clone();
            existing.extend(set);
            let modified = *existing != before;
            debug!(modified, "Document updated in memory");
            return Ok(UpdateResult::matched(modified));
        }

        if !upsert {
            debug!("No document matched update in memory");
            return Ok(UpdateResult::unmatched());
        }

        let mut document = filter.clone();
        document.extend(set);
        let id = ensure_id(&mut document)?;
        documents.push(document);

        debug!(id = %id, "Document upserted in memory");
        Ok(UpdateResult::upserted(id))
    }

    #[instrument(skip(self))]
    async fn increment(
        &self,
        collection: Collection,
        id: &str,
        field: &str,
        by: i64,
    ) -> Result<bool, AppError> {
        let mut collections = self.lock()?;
        let document = collections.get_mut(&collection).and_then(|documents| {
            documents
                .iter_mut()
                .find(|document| document.get(ID_FIELD).and_then(Value::as_str) == Some(id))
        });

        match document {
            Some(document) => {
                let value = incremented_counter(document.get(field), by).map_err(|e| {
                    warn!(error = %e, id = %id, field = %field, "Failed to increment counter in memory");
                    e
                })?;
                debug!(id = %id, field = %field, %value, "Counter incremented in memory");
                document.insert(field.to_string(), value);
                Ok(true)
            }
            None => {
                debug!(id = %id, "Document not found for increment in memory");
                Ok(false)
            }
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.lock().map(|_| ())
    }

    async fn close(&self) {
        debug!("In-memory document store closed");
    }
}

/// PostgreSQL implementation of the document store.
///
/// Every collection lives in one `documents` table keyed by
/// `(collection, id)`, with the document itself in a JSONB column.
/// Filters are evaluated with JSONB containment (`@>`).
pub struct PostgresDocumentStore {
    pool: PgPool,
}

const CREATE_DOCUMENTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    body JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (collection, id)
)";

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool and makes sure the `documents` table exists
    #[instrument(skip(database_url))]
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to connect to database");
                AppError::DatabaseError(e.to_string())
            })?;

        let store = Self::new(pool);
        store.ensure_schema().await?;

        info!("Connected to document database");
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(CREATE_DOCUMENTS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to create documents table");
                AppError::DatabaseError(e.to_string())
            })?;
        Ok(())
    }

    async fn first_matching_id(
        &self,
        collection: Collection,
        filter: &Document,
    ) -> Result<Option<String>, AppError> {
        let row = sqlx::query(
            "SELECT id FROM documents WHERE collection = $1 AND body @> $2 ORDER BY created_at, id LIMIT 1",
        )
        .bind(collection.as_ref())
        .bind(Json(filter))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, %collection, "Failed to look up document id");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|row| row.get("id")))
    }
}

fn body_of(row: &sqlx::postgres::PgRow) -> Result<Document, AppError> {
    row.try_get::<Json<Document>, _>("body")
        .map(|Json(document)| document)
        .map_err(|e| AppError::DatabaseError(e.to_string()))
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[instrument(skip(self, filter))]
    async fn find(
        &self,
        collection: Collection,
        filter: &Document,
    ) -> Result<Vec<Document>, AppError> {
        let rows = sqlx::query(
            "SELECT body FROM documents WHERE collection = $1 AND body @> $2 ORDER BY created_at, id",
        )
        .bind(collection.as_ref())
        .bind(Json(filter))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, %collection, "Failed to fetch documents from database");
            AppError::DatabaseError(e.to_string())
        })?;

        let documents = rows.iter().map(body_of).collect::<Result<Vec<_>, _>>()?;
        debug!(count = documents.len(), "Documents found in database");
        Ok(documents)
    }

    #[instrument(skip(self, filter))]
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Document,
    ) -> Result<Option<Document>, AppError> {
        let row = sqlx::query(
            "SELECT body FROM documents WHERE collection = $1 AND body @> $2 ORDER BY created_at, id LIMIT 1",
        )
        .bind(collection.as_ref())
        .bind(Json(filter))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, %collection, "Failed to fetch document from database");
            AppError::DatabaseError(e.to_string())
        })?;

        let document = row.as_ref().map(body_of).transpose()?;
        debug!(found = document.is_some(), "Single document lookup in database");
        Ok(document)
    }

    #[instrument(skip(self, document))]
    async fn insert_one(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> Result<InsertOneResult, AppError> {
        let id = ensure_id(&mut document)?;

        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection.as_ref())
            .bind(&id)
            .bind(Json(&document))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, %collection, "Failed to insert document into database");
                AppError::DatabaseError(e.to_string())
            })?;

        debug!(id = %id, "Document inserted in database");
        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    #[instrument(skip(self, filter, set))]
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Document,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateResult, AppError> {
        if let Some(id) = self.first_matching_id(collection, filter).await? {
            let result = sqlx::query(
                "UPDATE documents SET body = body || $3 WHERE collection = $1 AND id = $2 AND body || $3 IS DISTINCT FROM body",
            )
            .bind(collection.as_ref())
            .bind(&id)
            .bind(Json(&set))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, id = %id, "Failed to update document in database");
                AppError::DatabaseError(e.to_string())
            })?;

            let modified = result.rows_affected() > 0;
            debug!(id = %id, modified, "Document updated in database");
            return Ok(UpdateResult::matched(modified));
        }

        if !upsert {
            debug!("No document matched update in database");
            return Ok(UpdateResult::unmatched());
        }

        let mut document = filter.clone();
        document.extend(set);
        let inserted = self.insert_one(collection, document).await?;
        Ok(UpdateResult::upserted(inserted.inserted_id))
    }

    #[instrument(skip(self))]
    async fn increment(
        &self,
        collection: Collection,
        id: &str,
        field: &str,
        by: i64,
    ) -> Result<bool, AppError> {
        let database_error = |e: sqlx::Error| {
            warn!(error = %e, id = %id, field = %field, "Failed to increment counter in database");
            AppError::DatabaseError(e.to_string())
        };

        let mut tx = self.pool.begin().await.map_err(database_error)?;

        let row = sqlx::query(
            "SELECT body FROM documents WHERE collection = $1 AND id = $2 FOR UPDATE",
        )
        .bind(collection.as_ref())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(database_error)?;

        let Some(row) = row else {
            debug!(id = %id, "Document not found for increment in database");
            return Ok(false);
        };

        let mut document = body_of(&row)?;
        let value = incremented_counter(document.get(field), by).map_err(|e| {
            warn!(error = %e, id = %id, field = %field, "Failed to increment counter in database");
            e
        })?;
        document.insert(field.to_string(), value);

        sqlx::query("UPDATE documents SET body = $3 WHERE collection = $1 AND id = $2")
            .bind(collection.as_ref())
            .bind(id)
            .bind(Json(&document))
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;
        tx.commit().await.map_err(database_error)?;

        debug!(id = %id, field = %field, "Counter incremented in database");
        Ok(true)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}
