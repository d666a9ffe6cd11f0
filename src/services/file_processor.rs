use bytes::Bytes;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use crate::error::ExtractError;
use crate::models::{ExtractionResult, LogicalGrid};
use crate::services::delimited::DelimitedReader;
use crate::services::excel::{ExcelProcessor, SpreadsheetFormat};
use crate::services::extractor::Extractor;

/// Supported input formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Spreadsheet(SpreadsheetFormat),
    Csv,
}

impl FileFormat {
    /// Case-insensitive match on the file name suffix.
    pub fn from_file_name(file_name: &str) -> Result<Self, ExtractError> {
        let lower = file_name.trim().to_lowercase();
        if lower.ends_with(".xlsx") {
            Ok(FileFormat::Spreadsheet(SpreadsheetFormat::Xlsx))
        } else if lower.ends_with(".xls") {
            Ok(FileFormat::Spreadsheet(SpreadsheetFormat::Xls))
        } else if lower.ends_with(".csv") {
            Ok(FileFormat::Csv)
        } else {
            tracing::error!("Unsupported file type: {}", file_name);
            Err(ExtractError::UnsupportedFormat(file_name.to_string()))
        }
    }
}

/// Entry point for extracting one file: picks the adapter by extension,
/// builds the grid and runs the [`Extractor`] over it.
#[derive(Debug, Clone, Default)]
pub struct FileProcessor {
    extractor: Extractor,
    csv_reader: DelimitedReader,
}

impl FileProcessor {
    pub fn new(extractor: Extractor, csv_reader: DelimitedReader) -> Self {
        Self { extractor, csv_reader }
    }

    /// The file is only opened once its extension is known to be supported,
    /// and is closed before extraction starts.
    pub fn process_path(&self, path: &Path) -> Result<ExtractionResult, ExtractError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let format = FileFormat::from_file_name(&file_name)?;

        let file_data = {
            let mut file = File::open(path).map_err(|e| {
                tracing::error!("Failed to open {}: {}", path.display(), e);
                ExtractError::Io(format!("Failed to open {}: {}", path.display(), e))
            })?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)?;
            buf
        };

        self.process_format(&file_name, format, Bytes::from(file_data))
    }

    pub fn process_reader<R: Read>(&self, file_name: &str, mut reader: R) -> Result<ExtractionResult, ExtractError> {
        let format = FileFormat::from_file_name(file_name)?;

        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;

        self.process_format(file_name, format, Bytes::from(buf))
    }

    pub fn process_bytes(&self, file_name: &str, file_data: Bytes) -> Result<ExtractionResult, ExtractError> {
        let format = FileFormat::from_file_name(file_name)?;
        self.process_format(file_name, format, file_data)
    }

    fn process_format(
        &self,
        file_name: &str,
        format: FileFormat,
        file_data: Bytes,
    ) -> Result<ExtractionResult, ExtractError> {
        let start = std::time::Instant::now();
        tracing::info!("Processing file: {} ({:?})", file_name, format);

        let grid = self.read_grid(format, file_data)?;
        let result = self.extractor.extract(&grid);

        tracing::info!(
            "Extracted {} fixed cells and {} data rows from {} in {:?} (stopped at row {}: {:?})",
            result.fixed_cells.len(),
            result.rows.len(),
            file_name,
            start.elapsed(),
            result.stopped_at.row_number,
            result.stopped_at.reason
        );
        Ok(result)
    }

    fn read_grid(&self, format: FileFormat, file_data: Bytes) -> Result<LogicalGrid, ExtractError> {
        match format {
            FileFormat::Spreadsheet(kind) => ExcelProcessor::new(kind).read_grid(file_data),
            FileFormat::Csv => self.csv_reader.read_grid(&file_data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SourceKind, StopReason};
    use crate::services::cell_value::OUT_OF_BOUNDS;
    use std::io::{self, Cursor};

    /// A reader that fails the test if it is ever read.
    struct UntouchableReader;

    impl Read for UntouchableReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            panic!("reader must not be touched for unsupported formats");
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "disk went away"))
        }
    }

    #[test]
    fn dispatches_on_extension_case_insensitively() {
        assert_eq!(
            FileFormat::from_file_name("Data.XLSX").unwrap(),
            FileFormat::Spreadsheet(SpreadsheetFormat::Xlsx)
        );
        assert_eq!(
            FileFormat::from_file_name("legacy.Xls").unwrap(),
            FileFormat::Spreadsheet(SpreadsheetFormat::Xls)
        );
        assert_eq!(FileFormat::from_file_name("export.csv").unwrap(), FileFormat::Csv);
    }

    #[test]
    fn rejects_other_extensions() {
        for name in ["report.TXT", "report", "xlsx", "report.xlsm", "report.csv.bak"] {
            assert!(
                matches!(FileFormat::from_file_name(name), Err(ExtractError::UnsupportedFormat(_))),
                "{name}"
            );
        }
    }

    #[test]
    fn unsupported_format_fails_before_reading() {
        let err = FileProcessor::default()
            .process_reader("report.TXT", UntouchableReader)
            .unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(name) if name == "report.TXT"));
    }

    #[test]
    fn unsupported_path_is_never_opened() {
        let err = FileProcessor::default()
            .process_path(Path::new("/definitely/not/here/report.TXT"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_file_is_io_failure() {
        let err = FileProcessor::default()
            .process_path(Path::new("/definitely/not/here/report.csv"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }

    #[test]
    fn read_failure_is_io_failure() {
        let err = FileProcessor::default()
            .process_reader("data.csv", FailingReader)
            .unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }

    #[test]
    fn csv_from_reader() {
        let mut data = String::new();
        for n in 1..=9 {
            data.push_str(&format!("r{n},,,v{n}\n"));
        }
        data.push_str(",x,y,z\n,,,\n,late\n");

        let result = FileProcessor::default()
            .process_reader("export.csv", Cursor::new(data))
            .unwrap();

        assert_eq!(result.source, SourceKind::Delimited);
        assert_eq!(result.fixed("D3"), Some("v3"));
        assert_eq!(result.fixed("D6"), Some("v6"));
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].values[..3], ["x", "y", "z"]);
        assert!(result.rows[0].values[3..].iter().all(|v| v == OUT_OF_BOUNDS));
        assert_eq!(result.stopped_at.reason, StopReason::BlankRow);
    }

    #[test]
    fn malformed_csv_returns_no_result() {
        let err = FileProcessor::default()
            .process_bytes("broken.csv", Bytes::from_static(b"a,b\n\"never closed\n"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }
}
