use bus_service::config::ServerConfig;
use bus_service::store::MemoryStore;
use bus_service::web::{AppState, create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");
    tracing::info!(
        data = %config.data_path.display(),
        postal_code = %config.validation.postal_code,
        "loaded configuration"
    );

    let store = MemoryStore::load(&config.data_path).expect("Failed to load record store");
    let state = AppState::new(store, config.validation.clone());
    let app = create_router(state, &config.static_dir);

    let addr = config.addr;
    tracing::info!("Bus service listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
