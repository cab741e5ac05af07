use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, instrument, warn};

use super::errors::SessionError;
use super::types::{IdentityClaim, SessionClaims};
use crate::shared::AppError;

/// Session lifetime policy: one year
pub const SESSION_TTL_DAYS: i64 = 365;

/// Signs and verifies session tokens (HS256 JWTs)
#[derive(Clone)]
pub struct TokenService {
    secret: Option<String>,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret_configured", &self.secret.is_some())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: Option<String>) -> Self {
        Self::with_ttl(secret, Duration::days(SESSION_TTL_DAYS))
    }

    pub fn with_ttl(secret: Option<String>, ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Creates a signed token carrying `claim`, expiring one TTL from now
    pub fn issue(&self, claim: IdentityClaim) -> Result<String, AppError> {
        self.issue_at(claim, Utc::now())
    }

    #[instrument(skip(self, claim))]
    pub fn issue_at(&self, claim: IdentityClaim, now: DateTime<Utc>) -> Result<String, AppError> {
        let secret = self.secret.as_ref().ok_or_else(|| {
            warn!("Cannot issue session token without a signing secret");
            AppError::JwtError("signing secret is not configured".to_string())
        })?;

        let exp = (now + self.ttl).timestamp();
        debug!(
            ttl_days = self.ttl.num_days(),
            exp_timestamp = exp,
            "Creating session token"
        );

        let claims = SessionClaims {
            identity: claim.without_reserved(),
            exp,
            iat: now.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode session token");
            AppError::JwtError(e.to_string())
        })
    }

    /// Checks the signature and expiry of `token` and returns the embedded identity
    pub fn verify(&self, token: &str) -> Result<IdentityClaim, SessionError> {
        self.verify_at(token, Utc::now())
    }

    #[instrument(skip(self, token))]
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaim, SessionError> {
        let secret = self.secret.as_ref().ok_or_else(|| {
            warn!("Cannot verify session token without a signing secret");
            SessionError::InvalidSignature
        })?;

        // Expiry is checked below against `now`, not the system clock
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        let claims = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            debug!(error = %e, "Failed to decode session token");
            SessionError::InvalidSignature
        })?;

        if now.timestamp() >= claims.exp {
            debug!(exp = claims.exp, now = now.timestamp(), "Session token expired");
            return Err(SessionError::Expired);
        }

        debug!(
            email = claims.identity.email().unwrap_or("<none>"),
            exp = claims.exp,
            "Session token verified"
        );
        Ok(claims.identity)
    }
}
