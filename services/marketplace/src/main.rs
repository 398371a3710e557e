use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leadbridge_auth::JwtService;
use leadbridge_database::{create_pool, run_migrations};
use leadbridge_marketplace::{
    build_app,
    config::{MarketplaceConfig, StorageBackend},
    notifications::LogNotifier,
    payment_codes::RandomCodeGenerator,
    store::{MarketplaceStore, MemoryStore, PgStore},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leadbridge_marketplace=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = MarketplaceConfig::from_env()?;

    let store: Arc<dyn MarketplaceStore> = match config.storage {
        StorageBackend::Postgres => {
            let db_pool = create_pool(&config.database).await?;
            run_migrations(&db_pool).await?;
            Arc::new(PgStore::new(db_pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let app_state = AppState::new(
        store,
        JwtService::new(&config.jwt),
        Arc::new(LogNotifier),
        Arc::new(RandomCodeGenerator::new(config.lifecycle.payment_code_length)),
        config.lifecycle.clone(),
    );

    let app = build_app(app_state, &config.server);

    // Start the server
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))
            .await?;

    tracing::info!(
        "Marketplace service listening on {}:{} (auto-verify: {})",
        config.server.host,
        config.server.port,
        config.lifecycle.lead_auto_verify
    );

    axum::serve(listener, app).await?;

    Ok(())
}
