use super::cell_value::{cell_value_as_string, is_blank, OUT_OF_BOUNDS, ROW_MISSING};
use super::excel::utils::{column_index, column_letters, CellAddress};
use crate::models::{
    Cell, DataRow, ExtractionResult, ExtractionStop, FixedCell, LogicalGrid, Row, SourceKind,
    StopReason,
};

/// Which cells an [`Extractor`] pulls out of a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionLayout {
    fixed_cells: Vec<CellAddress>,
    data_start_row: usize,
    first_column: usize,
    last_column: usize,
}

impl Default for ExtractionLayout {
    /// D3..D6 as fixed cells, data block from row 10 over columns B..I.
    fn default() -> Self {
        Self {
            fixed_cells: ["D3", "D4", "D5", "D6"]
                .iter()
                .filter_map(|label| CellAddress::parse(label))
                .collect(),
            data_start_row: 9,
            first_column: column_index("B"),
            last_column: column_index("I"),
        }
    }
}

impl ExtractionLayout {
    /// `data_start_row` is 0-indexed; the column window is inclusive.
    pub fn new(
        fixed_cells: Vec<CellAddress>,
        data_start_row: usize,
        first_column: usize,
        last_column: usize,
    ) -> Self {
        debug_assert!(first_column <= last_column);
        Self {
            fixed_cells,
            data_start_row,
            first_column,
            last_column,
        }
    }

    pub fn fixed_cells(&self) -> &[CellAddress] {
        &self.fixed_cells
    }

    pub fn data_start_row(&self) -> usize {
        self.data_start_row
    }

    pub fn columns(&self) -> std::ops::RangeInclusive<usize> {
        self.first_column..=self.last_column
    }
}

/// Pulls fixed cells and the data block out of a [`LogicalGrid`].
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    layout: ExtractionLayout,
}

impl Extractor {
    pub fn new(layout: ExtractionLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ExtractionLayout {
        &self.layout
    }

    pub fn extract(&self, grid: &LogicalGrid) -> ExtractionResult {
        let fixed_cells = self.extract_fixed_cells(grid);
        let (rows, stopped_at) = self.extract_rows(grid);

        ExtractionResult {
            source: grid.source(),
            fixed_cells,
            rows,
            stopped_at,
        }
    }

    pub fn extract_fixed_cells(&self, grid: &LogicalGrid) -> Vec<FixedCell> {
        self.layout
            .fixed_cells
            .iter()
            .map(|address| {
                let value = match address.row_index().and_then(|idx| grid.row(idx)) {
                    // Fixed cells keep delimited text as read; only the
                    // data block trims.
                    Some(row) => cell_value_as_string(row.cell(address.column())),
                    None => {
                        tracing::warn!(
                            "{}: row {} is missing",
                            address,
                            address.row_number()
                        );
                        ROW_MISSING.to_string()
                    }
                };
                FixedCell {
                    address: address.label().to_string(),
                    value,
                }
            })
            .collect()
    }

    /// Collects rows from the start row until the first missing or
    /// effectively blank row. Any data after that row is dropped.
    pub fn extract_rows(&self, grid: &LogicalGrid) -> (Vec<DataRow>, ExtractionStop) {
        let mut rows = Vec::new();

        for row_idx in self.layout.data_start_row..grid.row_count() {
            let Some(row) = grid.row(row_idx) else {
                tracing::debug!("Reached missing row at {}, stopping data extraction", row_idx + 1);
                return (rows, stop(row_idx, StopReason::MissingRow));
            };

            let (values, blank) = self.window_values(grid.source(), row);
            if blank {
                tracing::debug!(
                    "All cells in range {}-{} of row {} are blank, stopping data extraction",
                    column_letters(self.layout.first_column),
                    column_letters(self.layout.last_column),
                    row_idx + 1
                );
                return (rows, stop(row_idx, StopReason::BlankRow));
            }

            rows.push(DataRow {
                row_number: row_idx + 1,
                values,
            });
        }

        let end = grid.row_count().max(self.layout.data_start_row);
        tracing::debug!("Reached end of data after row {}", end);
        (rows, stop(end, StopReason::EndOfData))
    }

    /// Normalized values for the column window, and whether every one of
    /// them counts as blank.
    fn window_values(&self, source: SourceKind, row: &Row) -> (Vec<String>, bool) {
        let mut all_blank = true;
        let values = self
            .layout
            .columns()
            .map(|col| {
                let (value, blank) = match source {
                    SourceKind::Delimited if col >= row.len() => (OUT_OF_BOUNDS.to_string(), true),
                    SourceKind::Delimited => match row.cell(col) {
                        Some(Cell::Text(text)) => {
                            let trimmed = text.trim();
                            (trimmed.to_string(), trimmed.is_empty())
                        }
                        cell => (cell_value_as_string(cell), is_blank(cell)),
                    },
                    SourceKind::Spreadsheet => {
                        let cell = row.cell(col);
                        (cell_value_as_string(cell), is_blank(cell))
                    }
                };
                all_blank &= blank;
                value
            })
            .collect();
        (values, all_blank)
    }
}

fn stop(row_idx: usize, reason: StopReason) -> ExtractionStop {
    ExtractionStop {
        row_number: row_idx + 1,
        reason,
    }
}
