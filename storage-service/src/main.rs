use std::sync::Arc;

use anyhow::Result;
use shared::observability::{init_logging, LogConfig};
use tracing::info;

use storage_service::{
    config::Config,
    routes,
    storage::{ObjectAccessor, S3Store, StoreHandle},
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    // Initialize tracing
    init_logging(LogConfig {
        level: config.logging.level,
        format: config.logging.format,
        service_name: "storage-service".to_string(),
        ..Default::default()
    })?;

    info!("Starting Storage Service...");

    // Initialize the object store
    let handle = Arc::new(StoreHandle::from_config(&config.storage).await);
    let store = S3Store::new(handle);
    info!("S3 store initialized successfully");

    // Create app state
    let state = AppState {
        accessor: Arc::new(ObjectAccessor::new(Arc::new(store))),
    };

    let app = routes::router(state);

    let addr = config.server.bind_address();
    info!("Storage Service listening on {}", addr);

    // Run the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
