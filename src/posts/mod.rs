// Public API - what other modules can use
pub use handlers::{create_post, downvote_post, get_post, list_posts, my_posts, upvote_post};
pub use service::{PostService, AUTHOR_FIELD};
pub use types::{MyPostsQuery, Vote};

// Internal modules
mod handlers;
mod service;
mod types;
