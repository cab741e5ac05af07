use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::config::CookiePolicy;
use crate::payment::PaymentProvider;
use crate::session::{SessionError, TokenService};
use crate::store::DocumentStore;

/// Message returned for every rejected session, whatever the cause
pub const UNAUTHORIZED_MESSAGE: &str = "unauthorized access";

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub token_service: TokenService,
    pub cookie_policy: CookiePolicy,
    pub store: Arc<dyn DocumentStore + Send + Sync>,
    pub payment_provider: Arc<dyn PaymentProvider + Send + Sync>,
}

impl AppState {
    pub fn new(
        token_service: TokenService,
        cookie_policy: CookiePolicy,
        store: Arc<dyn DocumentStore + Send + Sync>,
        payment_provider: Arc<dyn PaymentProvider + Send + Sync>,
    ) -> Self {
        Self {
            token_service,
            cookie_policy,
            store,
            payment_provider,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] SessionError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Payment provider error: {0}")]
    PaymentError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Every session failure looks the same to the client
            AppError::Unauthorized(_) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": UNAUTHORIZED_MESSAGE })),
            )
                .into_response(),
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": msg }))).into_response()
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": msg }))).into_response()
            }
            AppError::JwtError(_)
            | AppError::DatabaseError(_)
            | AppError::PaymentError(_)
            | AppError::Internal => {
                error!(error = %self, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
