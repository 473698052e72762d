use std::{sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use messcut_backend::{
    build_router,
    config::{mask_secret, Config, StoreBackend},
    db::connection::create_pool,
    repositories::{InMemoryRequestStore, PgRequestStore, RemoteRequestStore, RequestStore},
    state::AppState,
};

async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn RequestStore>> {
    let store: Arc<dyn RequestStore> = match config.store_backend {
        StoreBackend::Memory => Arc::new(InMemoryRequestStore::new(config.time_zone)),
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;
            let pool = create_pool(url, config.database_max_connections).await?;
            sqlx::migrate!("./migrations").run(pool.as_ref()).await?;
            Arc::new(PgRequestStore::new(pool, config.time_zone))
        }
        StoreBackend::Remote => {
            let base_url = config
                .remote_api_base_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("REMOTE_API_BASE_URL is not set"))?;
            Arc::new(RemoteRequestStore::new(
                base_url,
                config.remote_api_token.clone(),
                config.remote_status_vocabulary,
                config.store_call_timeout + Duration::from_millis(500),
            )?)
        }
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "messcut_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        store = %config.store_backend,
        database_url = %config.database_url.as_deref().map(mask_secret).unwrap_or_default(),
        remote_api_base_url = config.remote_api_base_url.as_deref().unwrap_or(""),
        remote_api_token = %config.remote_api_token.as_deref().map(mask_secret).unwrap_or_default(),
        remote_status_vocabulary = %config.remote_status_vocabulary,
        bulk_dispatch = ?config.bulk_dispatch,
        store_call_timeout_ms = config.store_call_timeout.as_millis() as u64,
        time_zone = %config.time_zone,
        "Loaded configuration from environment/.env"
    );

    let store = open_store(&config).await?;
    let addr = config.bind_addr;
    let app = build_router(AppState::new(store, config));

    tracing::info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
