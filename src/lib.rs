//! Extracts a fixed set of header cells and a data block from `.xlsx`, `.xls`
//! and `.csv` files through one logical grid model.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;

pub use error::ExtractError;
pub use models::{Cell, ExtractionResult, LogicalGrid, Row, SourceKind};
pub use services::extractor::{ExtractionLayout, Extractor};
pub use services::file_processor::{FileFormat, FileProcessor};

// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub processor: FileProcessor,
}

impl AppState {
    pub fn new(config: config::Config) -> Self {
        Self {
            config,
            processor: FileProcessor::default(),
        }
    }
}
