use anyhow::Result;
use std::sync::Arc;

use sheet_extractor::{config, logging, routes, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::load_config()?;

    // Initialize logging
    logging::init_logging(&config.log_filter)?;

    let addr = config.bind_address();

    // Build our application state
    let state = Arc::new(AppState::new(config));

    // Build our application with a route
    let app = routes::routes(state);

    // Run it
    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
