use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use super::cookies::TOKEN_COOKIE;
use super::errors::SessionError;
use super::types::AuthenticatedUser;
use crate::shared::{AppError, AppState};

/// Session middleware - validates the `token` cookie and adds AuthenticatedUser to the request.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), session::verify_token))
/// Handlers can then extract Extension(user): Extension<AuthenticatedUser>.
#[instrument(skip(state, jar, req, next), fields(uri = %req.uri()))]
pub async fn verify_token(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            warn!("Missing session token cookie");
            SessionError::MissingToken
        })?;

    let identity = state.token_service.verify(token).map_err(|e| {
        warn!(reason = %e, "Session verification failed");
        e
    })?;

    info!(
        email = identity.email().unwrap_or("<none>"),
        "Authentication successful, adding identity to request"
    );

    req.extensions_mut().insert(AuthenticatedUser(identity));

    Ok(next.run(req).await)
}
