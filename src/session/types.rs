use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claim keys owned by the token itself; caller-supplied values are replaced at issuance
pub const RESERVED_CLAIMS: [&str; 2] = ["exp", "iat"];

/// Caller-supplied identity embedded in a session token.
///
/// No schema is enforced: whatever JSON object arrives at sign-in is carried
/// verbatim. `email` is the only field the rest of the app looks at.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct IdentityClaim(pub Map<String, Value>);

impl IdentityClaim {
    pub fn email(&self) -> Option<&str> {
        self.0.get("email").and_then(Value::as_str)
    }

    /// Drops the reserved JWT timestamp keys, if the caller sent any
    pub fn without_reserved(mut self) -> Self {
        for key in RESERVED_CLAIMS {
            self.0.remove(key);
        }
        self
    }
}

/// JWT claims structure: the identity fields plus the standard timestamps
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    #[serde(flatten)]
    pub identity: IdentityClaim,
    pub exp: i64, // Expiration timestamp (standard JWT claim)
    pub iat: i64, // Issued at timestamp (standard JWT claim)
}

/// Identity attached to a request once the session middleware accepts it.
/// Handlers behind the middleware can take `Extension<AuthenticatedUser>`.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser(pub IdentityClaim);

/// Response body for `/jwt` and `/logout`
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionResponse {
    pub success: bool,
}

impl SessionResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
