use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};
use serde_json::json;
use axum::Json;
use thiserror::Error;

/// Failures surfaced by the extraction core.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}. Please provide an Excel (.xls, .xlsx) or CSV (.csv) file")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<std::io::Error> for ExtractError {
    fn from(err: std::io::Error) -> Self {
        ExtractError::Io(err.to_string())
    }
}

impl From<csv::Error> for ExtractError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            ExtractError::Io(err.to_string())
        } else {
            ExtractError::Parse(err.to_string())
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    InvalidInput(String),
    UnsupportedFormat(String),
    IoError(String),
    ParseError(String),
    Internal(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::UnsupportedFormat(msg) => write!(f, "Unsupported format: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::UnsupportedFormat(name) => AppError::UnsupportedFormat(name),
            ExtractError::Io(msg) => AppError::IoError(msg),
            ExtractError::Parse(msg) => AppError::ParseError(msg),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Extraction task failed: {}", err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            AppError::IoError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ParseError(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
