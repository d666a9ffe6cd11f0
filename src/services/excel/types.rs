/// Binary workbook variant, chosen from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    /// Office Open XML (`.xlsx`).
    Xlsx,
    /// Legacy BIFF (`.xls`).
    Xls,
}

impl SpreadsheetFormat {
    pub fn extension(self) -> &'static str {
        match self {
            SpreadsheetFormat::Xlsx => "xlsx",
            SpreadsheetFormat::Xls => "xls",
        }
    }
}
