// Public API - what other modules can use
pub use cookies::TOKEN_COOKIE;
pub use errors::SessionError;
pub use handlers::{issue_session, logout};
pub use middleware::verify_token;
pub use token::{TokenService, SESSION_TTL_DAYS};
pub use types::{AuthenticatedUser, IdentityClaim, SessionClaims, SessionResponse};

// Internal modules
mod cookies;
mod errors;
mod handlers;
mod middleware;
mod token;
mod types;
