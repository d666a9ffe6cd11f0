//! Canonical text rendering of cell values.

use crate::models::Cell;

/// No cell exists at the position.
pub const BLANK_OR_NULL: &str = "[BLANK/NULL]";
/// A cell exists but holds nothing.
pub const BLANK: &str = "[BLANK]";
pub const FORMULA_ERROR: &str = "[FORMULA ERROR]";
pub const UNKNOWN: &str = "[UNKNOWN]";
/// Column lies past the end of a delimited-text record.
pub const OUT_OF_BOUNDS: &str = "[OUT_OF_BOUNDS]";
/// The addressed row does not exist.
pub const ROW_MISSING: &str = "[ROW MISSING]";

/// Renders a cell (or its absence) as canonical text.
pub fn cell_value_as_string(cell: Option<&Cell>) -> String {
    let Some(cell) = cell else {
        return BLANK_OR_NULL.to_string();
    };

    match cell {
        Cell::Text(text) => text.clone(),
        Cell::DateTime(dt) => dt.to_string(),
        Cell::Number(n) => format_number(*n),
        Cell::Boolean(b) => b.to_string(),
        Cell::Blank => BLANK.to_string(),
        Cell::Error => FORMULA_ERROR.to_string(),
        Cell::Unknown => UNKNOWN.to_string(),
    }
}

/// Integral values print without a decimal point; everything else prints as
/// a plain decimal.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n == n.trunc() && n.abs() < i64::MAX as f64 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

/// Absent and explicitly blank cells both count as blank.
pub fn is_blank(cell: Option<&Cell>) -> bool {
    matches!(cell, None | Some(Cell::Blank))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn absent_and_blank_use_distinct_sentinels() {
        assert_eq!(cell_value_as_string(None), BLANK_OR_NULL);
        assert_eq!(cell_value_as_string(Some(&Cell::Blank)), BLANK);
        assert_ne!(BLANK_OR_NULL, BLANK);
    }

    #[test]
    fn text_is_verbatim() {
        assert_eq!(cell_value_as_string(Some(&Cell::Text("  padded ".into()))), "  padded ");
    }

    #[test]
    fn integral_numbers_drop_the_fraction() {
        assert_eq!(cell_value_as_string(Some(&Cell::Number(42.0))), "42");
        assert_eq!(cell_value_as_string(Some(&Cell::Number(-7.0))), "-7");
        assert_eq!(cell_value_as_string(Some(&Cell::Number(0.0))), "0");
        assert_eq!(cell_value_as_string(Some(&Cell::Number(1234567.0))), "1234567");
        assert_eq!(cell_value_as_string(Some(&Cell::Number(1e15))), "1000000000000000");
    }

    #[test]
    fn fractional_numbers_are_plain_decimals() {
        assert_eq!(cell_value_as_string(Some(&Cell::Number(3.25))), "3.25");
        assert_eq!(cell_value_as_string(Some(&Cell::Number(-0.5))), "-0.5");
        assert_eq!(cell_value_as_string(Some(&Cell::Number(0.0001))), "0.0001");
    }

    #[test]
    fn booleans_are_lowercase() {
        assert_eq!(cell_value_as_string(Some(&Cell::Boolean(true))), "true");
        assert_eq!(cell_value_as_string(Some(&Cell::Boolean(false))), "false");
    }

    #[test]
    fn dates_use_default_rendering() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(13, 45, 0)
            .unwrap();
        assert_eq!(cell_value_as_string(Some(&Cell::DateTime(dt))), "2024-01-02 13:45:00");
    }

    #[test]
    fn errors_and_unknowns_have_sentinels() {
        assert_eq!(cell_value_as_string(Some(&Cell::Error)), FORMULA_ERROR);
        assert_eq!(cell_value_as_string(Some(&Cell::Unknown)), UNKNOWN);
    }

    #[test]
    fn canonical_text_is_stable() {
        for value in ["42", "3.25", "true", "2024-01-02 00:00:00", "hello", BLANK, FORMULA_ERROR] {
            let once = cell_value_as_string(Some(&Cell::Text(value.to_string())));
            assert_eq!(once, value);
            assert_eq!(cell_value_as_string(Some(&Cell::Text(once.clone()))), once);
        }
    }

    #[test]
    fn blankness() {
        assert!(is_blank(None));
        assert!(is_blank(Some(&Cell::Blank)));
        assert!(!is_blank(Some(&Cell::Text(String::new()))));
        assert!(!is_blank(Some(&Cell::Number(0.0))));
    }
}
