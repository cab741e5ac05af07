use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use chatnest::{AppError, PaymentIntent, PaymentProvider};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Records every payment intent request and answers with a predictable secret
#[derive(Clone, Default)]
pub struct MockPaymentProvider {
    requests: Arc<RwLock<Vec<(i64, String)>>>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn requests(&self) -> Vec<(i64, String)> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, AppError> {
        self.requests
            .write()
            .await
            .push((amount, currency.to_string()));

        Ok(PaymentIntent {
            client_secret: format!("pi_mock_{}_secret_{}", amount, currency),
        })
    }
}
