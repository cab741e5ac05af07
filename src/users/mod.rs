// Public API - what other modules can use
pub use handlers::{get_user, list_users, upsert_user};
pub use service::UserService;
pub use types::UpsertUserResponse;

// Internal modules
mod handlers;
mod service;
mod types;
