use serde::{Deserialize, Serialize};

/// Request body for `POST /create-payment-intent`; `price` is in dollars
#[derive(Debug, Deserialize)]
pub struct PaymentIntentRequest {
    pub price: f64,
}

impl PaymentIntentRequest {
    /// Price converted to whole cents
    pub fn amount_in_cents(&self) -> i64 {
        (self.price * 100.0).round() as i64
    }
}

/// The part of a provider payment intent the client needs to confirm payment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentIntent {
    pub client_secret: String,
}
