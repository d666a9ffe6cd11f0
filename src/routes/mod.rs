use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use crate::AppState;

pub mod sheets;

pub fn routes(state: Arc<AppState>) -> Router {
    let max_file_size = state.config.max_file_size;

    Router::new()
        .route("/health", get(health_check))
        .merge(sheets::routes(max_file_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
