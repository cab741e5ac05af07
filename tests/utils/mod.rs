pub mod cookies;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
pub use cookies::ClientCookieJar;
#[allow(unused_imports)]
pub use mocks::MockPaymentProvider;
pub use setup::{TestResponse, TestSetup, TestSetupBuilder};
