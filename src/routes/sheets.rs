use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    routing::post,
    Router,
    Json,
    http::Method,
};
use serde::Deserialize;
use std::sync::Arc;
use crate::{
    AppState,
    error::AppError,
    models::ExtractionResult,
    services::file_processor::FileFormat,
};
use tower_http::cors::{CorsLayer, Any};

pub fn routes(max_file_size: usize) -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/sheets/extract", post(extract_sheet))
        .layer(DefaultBodyLimit::max(max_file_size))
        .layer(cors)
}

#[derive(Debug, Deserialize)]
pub struct ExtractParams {
    file_name: String,
}

/// Accepts the raw file as the request body; the name only selects the format.
async fn extract_sheet(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExtractParams>,
    body: Bytes,
) -> Result<Json<ExtractionResult>, AppError> {
    let start = std::time::Instant::now();
    tracing::info!("Received {} ({}KB)", params.file_name, body.len() / 1024);

    FileFormat::from_file_name(&params.file_name)?;

    if body.is_empty() {
        return Err(AppError::InvalidInput("Request body is empty".to_string()));
    }
    if body.len() > state.config.max_file_size {
        return Err(AppError::InvalidInput(format!(
            "File is {} bytes, limit is {} bytes",
            body.len(),
            state.config.max_file_size
        )));
    }

    let processor = state.processor.clone();
    let file_name = params.file_name;
    let result = tokio::task::spawn_blocking(move || processor.process_bytes(&file_name, body))
        .await??;

    tracing::info!("Extraction request completed in {:?}", start.elapsed());
    Ok(Json(result))
}
