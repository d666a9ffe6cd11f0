pub mod processor;
pub mod types;
pub mod utils;

pub use processor::ExcelProcessor;
pub use types::SpreadsheetFormat;
