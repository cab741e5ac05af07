use axum_extra::extract::cookie::SameSite;
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:5174"];

/// Deployment environment, derived from `NODE_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Cookie attributes for the session cookie, resolved once at startup.
///
/// Cross-site cookies need `Secure; SameSite=None`, which a plain-HTTP
/// development server cannot set, so development falls back to `Strict`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookiePolicy {
    pub fn for_environment(environment: Environment) -> Self {
        if environment.is_production() {
            Self {
                secure: true,
                same_site: SameSite::None,
            }
        } else {
            Self {
                secure: false,
                same_site: SameSite::Strict,
            }
        }
    }
}

/// Process configuration read from the environment (and `.env` if present)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub environment: Environment,
    pub token_secret: Option<String>,
    pub database_url: Option<String>,
    pub payment_secret_key: Option<String>,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_ok() {
            info!("Loaded environment overrides from .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; `from_env` passes the process env.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(port = %raw, "Invalid PORT value, falling back to default");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let token_secret = non_empty("ACCESS_TOKEN_SECRET");
        if token_secret.is_none() {
            // Not fatal: issuance fails and every gated request is rejected.
            warn!("ACCESS_TOKEN_SECRET is not set; sessions cannot be issued or verified");
        }

        let allowed_origins = match non_empty("CORS_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty() && *origin != "null")
                .map(str::to_string)
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
        };

        Self {
            port,
            environment: Environment::from_name(lookup("NODE_ENV").as_deref()),
            token_secret,
            database_url: non_empty("DB_URI"),
            payment_secret_key: non_empty("STRIPE_SECRET_KEY"),
            allowed_origins,
        }
    }

    pub fn cookie_policy(&self) -> CookiePolicy {
        CookiePolicy::for_environment(self.environment)
    }
}
