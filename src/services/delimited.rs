//! Delimited text (CSV) reader.

use crate::error::ExtractError;
use crate::models::{LogicalGrid, Row, SourceKind};

/// Parses a whole delimited-text file into a [`LogicalGrid`].
///
/// Every field becomes a `Text` cell and records may differ in length.
/// Each record keeps its physical position: an empty line becomes a record
/// holding one empty field, the same as a delimiter-only line (`,,,`) keeps
/// its empty fields.
#[derive(Debug, Clone)]
pub struct DelimitedReader {
    delimiter: u8,
    quote: u8,
}

impl Default for DelimitedReader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
        }
    }
}

impl DelimitedReader {
    pub fn new(delimiter: u8, quote: u8) -> Self {
        Self { delimiter, quote }
    }

    pub fn read_grid(&self, file_data: &[u8]) -> Result<LogicalGrid, ExtractError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .quote(self.quote)
            .double_quote(true)
            .has_headers(false)
            .flexible(true)
            .from_reader(file_data);

        let mut rows = Vec::new();
        let mut record = csv::StringRecord::new();
        let mut last_record = None;

        loop {
            let start = (csv_reader.position().byte() as usize).min(file_data.len());
            let more = csv_reader.read_record(&mut record).map_err(|e| {
                tracing::error!("Failed to parse CSV record: {}", e);
                ExtractError::from(e)
            })?;

            // The parser drops lines holding only a terminator; put them back
            // so later records stay on their physical row.
            let skipped = empty_lines_at(file_data, start);
            if skipped > 0 {
                tracing::debug!("Restoring {} empty line(s) before row {}", skipped, rows.len() + 1);
            }
            rows.extend((0..skipped).map(|_| Some(Row::from_fields([""]))));

            if !more {
                break;
            }
            last_record = Some((start, rows.len() + 1));
            rows.push(Some(Row::from_fields(record.iter())));
        }

        // An unterminated quoted field swallows the rest of the input, so only
        // the final record can hold one.
        if let Some((start, row_number)) = last_record {
            if self.opens_unterminated_quote(&file_data[start..]) {
                tracing::error!("Unterminated quoted field in CSV row {}", row_number);
                return Err(ExtractError::Parse(format!(
                    "Unterminated quoted field in row {}",
                    row_number
                )));
            }
        }

        tracing::info!("Read {} CSV records", rows.len());
        Ok(LogicalGrid::new(SourceKind::Delimited, rows))
    }

    /// Walks a record the way the parser does: a quote only opens a quoted
    /// field as the first byte of a field, and a doubled quote inside one is
    /// a literal quote.
    fn opens_unterminated_quote(&self, record: &[u8]) -> bool {
        let mut field_start = true;
        let mut in_quotes = false;
        let mut bytes = record.iter().copied().peekable();

        while let Some(b) = bytes.next() {
            if in_quotes {
                if b == self.quote {
                    if bytes.peek() == Some(&self.quote) {
                        bytes.next();
                    } else {
                        in_quotes = false;
                    }
                }
            } else if b == self.quote && field_start {
                in_quotes = true;
                field_start = false;
            } else {
                field_start = b == self.delimiter || b == b'\n' || b == b'\r';
            }
        }
        in_quotes
    }
}

/// Number of empty lines starting at `pos`. A `\n` completing the previous
/// record's `\r\n` is not one of them.
fn empty_lines_at(data: &[u8], mut pos: usize) -> usize {
    if pos > 0 && data.get(pos - 1) == Some(&b'\r') && data.get(pos) == Some(&b'\n') {
        pos += 1;
    }

    let mut count = 0;
    loop {
        match data.get(pos) {
            Some(b'\n') => pos += 1,
            Some(b'\r') => {
                pos += 1;
                if data.get(pos) == Some(&b'\n') {
                    pos += 1;
                }
            }
            _ => return count,
        }
        count += 1;
    }
}
