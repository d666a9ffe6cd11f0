use chrono::NaiveDateTime;
use serde::Serialize;

/// A single typed cell value as read from a source file.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Boolean(bool),
    DateTime(NaiveDateTime),
    /// A cell exists but carries no value.
    Blank,
    /// A formula whose cached result is an error.
    Error,
    Unknown,
}

/// Where a grid came from. The extractor renders a few edge cases differently
/// per source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Spreadsheet,
    Delimited,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<Option<Cell>>,
}

impl Row {
    pub fn new(cells: Vec<Option<Cell>>) -> Self {
        Self { cells }
    }

    /// Builds a row where every field is a present `Text` cell.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: fields.into_iter().map(|f| Some(Cell::Text(f.into()))).collect(),
        }
    }

    pub fn set(&mut self, col: usize, cell: Cell) {
        if self.cells.len() <= col {
            self.cells.resize(col + 1, None);
        }
        self.cells[col] = Some(cell);
    }

    /// Returns `None` both for gaps and for columns past the physical end.
    pub fn cell(&self, col: usize) -> Option<&Cell> {
        self.cells.get(col).and_then(Option::as_ref)
    }

    /// Physical length of the row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// The unified in-memory table produced by either adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalGrid {
    source: SourceKind,
    rows: Vec<Option<Row>>,
}

impl LogicalGrid {
    pub fn new(source: SourceKind, rows: Vec<Option<Row>>) -> Self {
        Self { source, rows }
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index).and_then(Option::as_ref)
    }

    /// Number of row slots, i.e. one past the last populated row.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixedCell {
    pub address: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataRow {
    /// 1-based row number as shown by a spreadsheet application.
    pub row_number: usize,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every cell in the column window was blank.
    BlankRow,
    /// The row does not exist in the source.
    MissingRow,
    /// Ran past the last row of the source.
    EndOfData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtractionStop {
    pub row_number: usize,
    pub reason: StopReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub source: SourceKind,
    pub fixed_cells: Vec<FixedCell>,
    pub rows: Vec<DataRow>,
    pub stopped_at: ExtractionStop,
}

impl ExtractionResult {
    /// Looks up a fixed cell by its address label, e.g. `"D3"`.
    pub fn fixed(&self, address: &str) -> Option<&str> {
        self.fixed_cells
            .iter()
            .find(|cell| cell.address.eq_ignore_ascii_case(address))
            .map(|cell| cell.value.as_str())
    }

    /// Data block values without row numbers.
    pub fn row_values(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(|row| row.values.clone()).collect()
    }
}
