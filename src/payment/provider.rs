use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use super::types::PaymentIntent;
use crate::shared::AppError;

pub const STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Creates payment intents with an external payment provider
#[async_trait]
pub trait PaymentProvider {
    /// `amount` is in the currency's smallest unit (cents for USD)
    async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, AppError>;
}

/// Stripe implementation using the REST API directly
pub struct StripePaymentProvider {
    client: reqwest::Client,
    secret_key: Option<String>,
    api_base: String,
}

impl StripePaymentProvider {
    pub fn new(secret_key: Option<String>) -> Self {
        Self::with_api_base(secret_key, STRIPE_API_BASE)
    }

    pub fn with_api_base(secret_key: Option<String>, api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key,
            api_base: api_base.into(),
        }
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentProvider {
    #[instrument(skip(self))]
    async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, AppError> {
        let secret_key = self.secret_key.as_deref().ok_or_else(|| {
            warn!("Payment provider secret key is not configured");
            AppError::PaymentError("secret key is not configured".to_string())
        })?;

        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.api_base))
            .bearer_auth(secret_key)
            .form(&[
                ("amount", amount.to_string()),
                ("currency", currency.to_string()),
                ("payment_method_types[]", "card".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Payment provider request failed");
                AppError::PaymentError(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body, "Payment provider rejected payment intent");
            return Err(AppError::PaymentError(format!(
                "provider responded with {}",
                status
            )));
        }

        let intent = response.json::<PaymentIntent>().await.map_err(|e| {
            warn!(error = %e, "Unexpected payment provider response");
            AppError::PaymentError(e.to_string())
        })?;

        debug!("Payment intent created");
        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::post,
        Form, Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;

    /// Serves a minimal stand-in for the provider's payment intent endpoint
    async fn spawn_fake_provider() -> String {
        async fn payment_intents(
            headers: HeaderMap,
            Form(form): Form<HashMap<String, String>>,
        ) -> (StatusCode, Json<Value>) {
            let authorized = headers
                .get("authorization")
                .and_then(|value| value.to_str().ok())
                == Some("Bearer sk_test_ok");
            if !authorized {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": { "message": "Invalid API Key" } })),
                );
            }

            let secret = format!(
                "pi_{}_{}_{}_secret",
                form["amount"], form["currency"], form["payment_method_types[]"]
            );
            (
                StatusCode::OK,
                Json(json!({ "id": "pi_1", "object": "payment_intent", "client_secret": secret })),
            )
        }

        let app = Router::new().route("/v1/payment_intents", post(payment_intents));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_creates_payment_intent() {
        let base = spawn_fake_provider().await;
        let provider = StripePaymentProvider::with_api_base(Some("sk_test_ok".to_string()), base);

        let intent = provider.create_payment_intent(1999, "usd").await.unwrap();
        assert_eq!(intent.client_secret, "pi_1999_usd_card_secret");
    }

    #[tokio::test]
    async fn test_rejected_key_is_payment_error() {
        let base = spawn_fake_provider().await;
        let provider = StripePaymentProvider::with_api_base(Some("sk_test_bad".to_string()), base);

        let result = provider.create_payment_intent(1999, "usd").await;
        assert!(matches!(result, Err(AppError::PaymentError(_))));
    }

    #[tokio::test]
    async fn test_missing_key_is_payment_error() {
        let provider = StripePaymentProvider::new(None);

        let result = provider.create_payment_intent(1999, "usd").await;
        assert!(matches!(result, Err(AppError::PaymentError(_))));
    }
}
