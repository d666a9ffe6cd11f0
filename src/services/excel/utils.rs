use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static ADDRESS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]+)([0-9]+)$").expect("address pattern is valid")
});

/// Converts column letters ("A", "d", "AA") to a 0-indexed column.
///
/// Uses the bijective base-26 recurrence, so "AA" follows "Z" directly:
/// `A -> 0`, `Z -> 25`, `AA -> 26`, `BA -> 52`.
/// Input must match `[A-Za-z]+`.
pub fn column_index(letters: &str) -> usize {
    debug_assert!(
        !letters.is_empty() && letters.bytes().all(|b| b.is_ascii_alphabetic()),
        "invalid column letters: {:?}",
        letters
    );

    let index = letters.bytes().fold(-1i64, |index, b| {
        (index + 1) * 26 + i64::from(b.to_ascii_uppercase() - b'A')
    });
    index as usize
}

/// Inverse of [`column_index`].
pub fn column_letters(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// An A1-style single cell address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellAddress {
    label: String,
    column: usize,
    row_number: u32,
}

impl CellAddress {
    /// Parses labels like "D3". Returns `None` for anything else.
    pub fn parse(label: &str) -> Option<Self> {
        let caps = ADDRESS_PATTERN.captures(label.trim())?;
        let row_number = caps[2].parse().ok()?;
        Some(Self {
            label: label.trim().to_ascii_uppercase(),
            column: column_index(&caps[1]),
            row_number,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// 1-based row number as written in the label.
    pub fn row_number(&self) -> u32 {
        self.row_number
    }

    /// 0-indexed row, or `None` for row 0.
    pub fn row_index(&self) -> Option<usize> {
        (self.row_number as usize).checked_sub(1)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_letters() {
        assert_eq!(column_index("A"), 0);
        assert_eq!(column_index("B"), 1);
        assert_eq!(column_index("D"), 3);
        assert_eq!(column_index("I"), 8);
        assert_eq!(column_index("Z"), 25);
    }

    #[test]
    fn multi_letters_follow_bijective_recurrence() {
        assert_eq!(column_index("AA"), 26);
        assert_eq!(column_index("AB"), 27);
        assert_eq!(column_index("AZ"), 51);
        assert_eq!(column_index("BA"), 52);
        assert_eq!(column_index("ZZ"), 701);
        assert_eq!(column_index("AAA"), 702);
        assert_eq!(column_index("XFD"), 16383);
    }

    #[test]
    fn letters_are_case_insensitive() {
        assert_eq!(column_index("d"), 3);
        assert_eq!(column_index("aB"), 27);
    }

    #[test]
    fn letters_round_trip() {
        for index in [0, 1, 25, 26, 27, 51, 52, 701, 702, 16383] {
            assert_eq!(column_index(&column_letters(index)), index);
        }
        assert_eq!(column_letters(26), "AA");
    }

    #[test]
    fn parses_addresses() {
        let addr = CellAddress::parse("D3").unwrap();
        assert_eq!(addr.label(), "D3");
        assert_eq!(addr.column(), 3);
        assert_eq!(addr.row_number(), 3);
        assert_eq!(addr.row_index(), Some(2));

        let addr = CellAddress::parse("ab12").unwrap();
        assert_eq!(addr.label(), "AB12");
        assert_eq!(addr.column(), 27);
    }

    #[test]
    fn row_zero_has_no_index() {
        let addr = CellAddress::parse("D0").unwrap();
        assert_eq!(addr.row_index(), None);
    }

    #[test]
    fn rejects_malformed_addresses() {
        for label in ["", "D", "3", "3D", "D-3", "$D$3", "D3:E4"] {
            assert!(CellAddress::parse(label).is_none(), "{label}");
        }
    }
}
