use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trellis::config::ServiceConfig;
use trellis::query::FastPathTable;
use trellis::service::{self, AppState};
use trellis::store::MemoryStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trellis=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: snapshot_path={}, listen_port={}",
        config.snapshot_path.display(),
        config.listen_port
    );

    let mut store = match MemoryStore::load(&config.snapshot_path) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to load snapshot: {e}");
            std::process::exit(1);
        }
    };
    if let Some(enabled) = config.cardinality_inference {
        tracing::info!("Cardinality inference forced to {enabled}");
        store.set_cardinality_inference(enabled);
    }

    let app = service::router(AppState::new(store, FastPathTable::new()));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.listen_port));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind: {e}");
            std::process::exit(1);
        });

    axum::serve(listener, app).await.unwrap_or_else(|e| {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    });
}
