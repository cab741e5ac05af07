// Library crate for the ChatNest server
// This file exposes the public API for integration tests

pub mod announcements;
pub mod app;
pub mod config;
pub mod payment;
pub mod posts;
pub mod records;
pub mod session;
pub mod shared;
pub mod store;
pub mod tags;
pub mod users;

// Re-export commonly used types for easier access in tests
pub use app::build_router;
pub use config::{AppConfig, CookiePolicy, Environment};
pub use payment::{PaymentIntent, PaymentProvider, StripePaymentProvider};
pub use session::{AuthenticatedUser, IdentityClaim, SessionError, TokenService};
pub use shared::{AppError, AppState};
pub use store::{
    Collection, Document, DocumentStore, InMemoryDocumentStore, PostgresDocumentStore,
};
