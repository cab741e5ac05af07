use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument};

use super::cookies::{removal_cookie, session_cookie};
use super::types::{IdentityClaim, SessionResponse};
use crate::shared::{AppError, AppState};

/// HTTP handler for issuing a session
///
/// POST /jwt
/// Signs whatever identity the caller sends and stores it in the `token` cookie
#[instrument(name = "issue_session", skip(state, jar, claim))]
pub async fn issue_session(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(claim): Json<IdentityClaim>,
) -> Result<(CookieJar, Json<SessionResponse>), AppError> {
    info!(
        email = claim.email().unwrap_or("<none>"),
        "Issuing session token"
    );

    let token = state.token_service.issue(claim)?;
    let jar = jar.add(session_cookie(&state.cookie_policy, token));

    Ok((jar, Json(SessionResponse::ok())))
}

/// HTTP handler for ending a session
///
/// GET /logout
/// Tells the client to drop its `token` cookie; the token itself stays valid until expiry
#[instrument(name = "logout", skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SessionResponse>) {
    let jar = jar.add(removal_cookie(&state.cookie_policy));
    info!("Logout successful");

    (jar, Json(SessionResponse::ok()))
}
