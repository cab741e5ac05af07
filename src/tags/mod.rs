// Public API - what other modules can use
pub use handlers::{create_tag, list_tags};

// Internal modules
mod handlers;
