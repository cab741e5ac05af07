use axum_extra::extract::cookie::Cookie;

use crate::config::CookiePolicy;

/// Name of the cookie carrying the session token
pub const TOKEN_COOKIE: &str = "token";

/// Builds the `token` cookie set on sign-in
pub fn session_cookie(policy: &CookiePolicy, token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(policy.secure)
        .same_site(policy.same_site)
        .build()
}

/// Builds a removal cookie (empty value, `Max-Age=0`) with the same attributes
pub fn removal_cookie(policy: &CookiePolicy) -> Cookie<'static> {
    let mut cookie = session_cookie(policy, String::new());
    cookie.make_removal();
    cookie
}
