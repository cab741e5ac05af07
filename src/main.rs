use chatnest::{
    build_router, AppConfig, AppState, DocumentStore, InMemoryDocumentStore,
    PostgresDocumentStore, StripePaymentProvider, TokenService,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatnest=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ChatNest server");

    let config = AppConfig::from_env();
    info!(
        port = config.port,
        environment = ?config.environment,
        "Configuration loaded"
    );

    // Explicitly constructed store handle, injected into every handler
    let store: Arc<dyn DocumentStore + Send + Sync> = match &config.database_url {
        Some(url) => Arc::new(PostgresDocumentStore::connect(url).await?),
        None => {
            warn!("DB_URI is not set; using the in-memory document store");
            Arc::new(InMemoryDocumentStore::new())
        }
    };

    // Readiness is reported, not enforced
    match store.ping().await {
        Ok(()) => info!("Document store responded to ping"),
        Err(e) => warn!(error = %e, "Document store ping failed; serving anyway"),
    }

    let app_state = AppState::new(
        TokenService::new(config.token_secret.clone()),
        config.cookie_policy(),
        Arc::clone(&store),
        Arc::new(StripePaymentProvider::new(config.payment_secret_key.clone())),
    );

    let app = build_router(app_state, &config.allowed_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("ChatNest is running on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
