use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

use chatnest::{
    build_router, AppState, CookiePolicy, Environment, InMemoryDocumentStore, TokenService,
};

use super::cookies::ClientCookieJar;
use super::mocks::MockPaymentProvider;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestSetup {
    pub app: Router,
    pub store: Arc<InMemoryDocumentStore>,
    pub payments: MockPaymentProvider,
    pub token_service: TokenService,
}

/// Status, `Set-Cookie` headers and JSON body of a response
pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookies: Vec<String>,
    pub body: Value,
}

pub struct TestSetupBuilder {
    environment: Environment,
    secret: Option<String>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            environment: Environment::Development,
            secret: Some(TEST_SECRET.to_string()),
        }
    }

    pub fn in_production(mut self) -> Self {
        self.environment = Environment::Production;
        self
    }

    pub fn build(self) -> TestSetup {
        let store = Arc::new(InMemoryDocumentStore::new());
        let payments = MockPaymentProvider::new();
        let token_service = TokenService::new(self.secret);

        let state = AppState::new(
            token_service.clone(),
            CookiePolicy::for_environment(self.environment),
            store.clone(),
            Arc::new(payments.clone()),
        );

        TestSetup {
            app: build_router(state, &["http://localhost:5173".to_string()]),
            store,
            payments,
            token_service,
        }
    }
}

impl TestSetup {
    /// Sends a request carrying the jar's cookies and applies any `Set-Cookie` to the jar
    pub async fn send(
        &self,
        jar: &mut ClientCookieJar,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie_header) = jar.header() {
            builder = builder.header(header::COOKIE, cookie_header);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let set_cookies: Vec<String> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|value| value.to_str().unwrap().to_string())
            .collect();
        for set_cookie in &set_cookies {
            jar.apply_set_cookie(set_cookie);
        }

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            set_cookies,
            body,
        }
    }
}
