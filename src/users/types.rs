use serde::Serialize;

use crate::store::{Document, UpdateResult};

/// Response for `PUT /users/:email`: the stored profile when the user
/// already exists, otherwise the upsert acknowledgment
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UpsertUserResponse {
    Existing(Document),
    Saved(UpdateResult),
}
