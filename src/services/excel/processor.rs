use super::types::SpreadsheetFormat;
use std::io::Cursor;
use bytes::Bytes;
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xls, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};
use crate::error::ExtractError;
use crate::models::{Cell, LogicalGrid, Row, SourceKind};

/// Reads the first worksheet of a workbook into a [`LogicalGrid`].
///
/// Formula cells surface their cached results; the workbook and its reader
/// are dropped before `read_grid` returns, on success or failure.
pub struct ExcelProcessor {
    format: SpreadsheetFormat,
}

impl ExcelProcessor {
    pub fn new(format: SpreadsheetFormat) -> Self {
        Self { format }
    }

    pub fn read_grid(&self, file_data: Bytes) -> Result<LogicalGrid, ExtractError> {
        tracing::info!("Opening {} workbook ({} bytes)", self.format.extension(), file_data.len());
        let start = std::time::Instant::now();

        let cursor = Cursor::new(file_data);
        let range = match self.format {
            SpreadsheetFormat::Xlsx => first_sheet_range::<Xlsx<_>>(cursor)?,
            SpreadsheetFormat::Xls => first_sheet_range::<Xls<_>>(cursor)?,
        };

        let grid = grid_from_range(&range);
        tracing::info!(
            "Read first sheet with {} row slots in {:?}",
            grid.row_count(),
            start.elapsed()
        );
        Ok(grid)
    }
}

fn first_sheet_range<R>(cursor: Cursor<Bytes>) -> Result<Range<Data>, ExtractError>
where
    R: Reader<Cursor<Bytes>>,
    R::Error: std::fmt::Display,
{
    let mut workbook: R = open_workbook_from_rs(cursor)
        .map_err(|e| {
            tracing::error!("Failed to open Excel file: {}", e);
            ExtractError::Io(format!("Failed to open Excel file: {}", e))
        })?;

    let sheet_names = workbook.sheet_names();
    tracing::debug!("Found {} sheets: {:?}", sheet_names.len(), sheet_names);

    match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => Ok(range),
        Some(Err(e)) => {
            tracing::error!("Failed to read first worksheet: {}", e);
            Err(ExtractError::Io(format!("Failed to read worksheet: {}", e)))
        }
        None => Err(ExtractError::Io("No sheets found in workbook".to_string())),
    }
}

/// Rows without a single populated cell are left absent.
pub fn grid_from_range(range: &Range<Data>) -> LogicalGrid {
    let Some((start_row, start_col)) = range.start() else {
        return LogicalGrid::new(SourceKind::Spreadsheet, Vec::new());
    };

    let mut rows: Vec<Option<Row>> = Vec::new();
    for (rel_row, rel_col, data) in range.used_cells() {
        let row_idx = start_row as usize + rel_row;
        let col_idx = start_col as usize + rel_col;

        if rows.len() <= row_idx {
            rows.resize(row_idx + 1, None);
        }
        rows[row_idx]
            .get_or_insert_with(Row::default)
            .set(col_idx, cell_from_data(data));
    }

    LogicalGrid::new(SourceKind::Spreadsheet, rows)
}

/// `Data::Empty` maps to `Cell::Blank`, but [`grid_from_range`] never
/// passes one in: calamine's used-cell iterator skips empty cells, so on
/// this path a blank cell reads as absent.
pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Boolean(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(_) => Cell::Unknown,
        Data::Error(_) => Cell::Error,
        Data::Empty => Cell::Blank,
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
