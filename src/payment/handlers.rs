use axum::{extract::State, Extension, Json};
use tracing::{info, instrument};

use super::types::{PaymentIntent, PaymentIntentRequest};
use crate::session::AuthenticatedUser;
use crate::shared::{AppError, AppState};

pub const PAYMENT_CURRENCY: &str = "usd";

/// HTTP handler for starting a card payment (session required)
///
/// POST /create-payment-intent
/// Returns the provider's client secret for the frontend to confirm the payment
#[instrument(name = "create_payment_intent", skip(state, user))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<PaymentIntentRequest>,
) -> Result<Json<PaymentIntent>, AppError> {
    let amount = request.amount_in_cents();
    info!(
        amount,
        email = user.0.email().unwrap_or("<none>"),
        "Creating payment intent"
    );

    let intent = state
        .payment_provider
        .create_payment_intent(amount, PAYMENT_CURRENCY)
        .await?;

    Ok(Json(intent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::IdentityClaim;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::post,
        Router,
    };
    use serde_json::json;
    use tower::ServiceExt; // for `oneshot`

    #[tokio::test]
    async fn test_create_payment_intent_handler() {
        let user = AuthenticatedUser(
            serde_json::from_value::<IdentityClaim>(json!({ "email": "a@b.com" })).unwrap(),
        );
        let app = Router::new()
            .route("/create-payment-intent", post(create_payment_intent))
            .layer(Extension(user))
            .with_state(AppStateBuilder::new().build());

        let request = Request::builder()
            .method("POST")
            .uri("/create-payment-intent")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"price": 12.5}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let intent: PaymentIntent = serde_json::from_slice(&body).unwrap();
        assert_eq!(intent.client_secret, "pi_dummy_1250_secret");
    }
}
