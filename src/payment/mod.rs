// Public API - what other modules can use
pub use handlers::create_payment_intent;
pub use provider::{PaymentProvider, StripePaymentProvider};
pub use types::{PaymentIntent, PaymentIntentRequest};

// Internal modules
mod handlers;
mod provider;
mod types;
