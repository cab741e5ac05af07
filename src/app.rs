use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use crate::{announcements, payment, posts, session, shared::AppState, tags, users};

/// Builds the full HTTP surface.
///
/// Only the create routes for posts, tags and announcements and the payment
/// intent route sit behind the session middleware; everything else is public.
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    let require_session = middleware::from_fn_with_state(state.clone(), session::verify_token);

    Router::new()
        .route("/", get(|| async { "Hello from ChatNest Server.." }))
        // Session issuance and termination
        .route("/jwt", post(session::issue_session))
        .route("/logout", get(session::logout))
        // Users
        .route("/users", get(users::list_users))
        .route("/users/:email", put(users::upsert_user).get(users::get_user))
        // Posts
        .route(
            "/posts",
            get(posts::list_posts)
                .merge(post(posts::create_post).route_layer(require_session.clone())),
        )
        .route("/posts/:id", get(posts::get_post))
        .route("/posts/:id/upvote", patch(posts::upvote_post))
        .route("/posts/:id/downvote", patch(posts::downvote_post))
        .route("/my-posts", get(posts::my_posts))
        // Tags and announcements
        .route(
            "/tags",
            get(tags::list_tags).merge(post(tags::create_tag).route_layer(require_session.clone())),
        )
        .route(
            "/announcements",
            get(announcements::list_announcements).merge(
                post(announcements::create_announcement).route_layer(require_session.clone()),
            ),
        )
        // Payments
        .route(
            "/create-payment-intent",
            post(payment::create_payment_intent).route_layer(require_session),
        )
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the browser frontend; credentials are allowed so the session cookie travels
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
