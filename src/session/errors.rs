use thiserror::Error;

/// Reasons a request fails session verification.
/// All of them map to the same 401 response.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no session token cookie")]
    MissingToken,

    #[error("session token signature does not verify")]
    InvalidSignature,

    #[error("session token has expired")]
    Expired,
}
