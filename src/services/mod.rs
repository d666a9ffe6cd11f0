pub mod cell_value;
pub mod delimited;
pub mod excel;
pub mod extractor;
pub mod file_processor;
