// Public API - what other modules can use
pub use models::{Collection, Document, InsertOneResult, UpdateResult, ID_FIELD};
pub use repository::{DocumentStore, InMemoryDocumentStore, PostgresDocumentStore};

// Internal modules
pub mod models;
pub mod repository;
