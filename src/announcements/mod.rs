// Public API - what other modules can use
pub use handlers::{create_announcement, list_announcements};

// Internal modules
mod handlers;
