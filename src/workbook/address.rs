//! A1-style cell addressing: column letters, cell references and merge ranges.
//!
//! All coordinates are 1-based, matching the row numbers a template author
//! sees in Excel (row 17 is row 17).

use crate::error::{EodError, EodResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest row number an .xlsx worksheet can hold
pub const MAX_ROWS: u32 = 1_048_576;

/// Highest column number an .xlsx worksheet can hold (XFD)
pub const MAX_COLUMNS: u32 = 16_384;

/// Convert a 1-based column number to Excel letters (1→A, 26→Z, 27→AA)
pub fn column_letter(col: u32) -> String {
    let mut result = String::new();
    let mut num = col;

    while num > 0 {
        let remainder = (num - 1) % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        num = (num - 1) / 26;
    }

    result
}

/// Convert Excel column letters to a 1-based column number (A→1, AA→27)
pub fn column_number(letters: &str) -> EodResult<u32> {
    let letters = letters.trim();
    if letters.is_empty() {
        return Err(EodError::Address("empty column reference".to_string()));
    }

    let mut num: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(EodError::Address(format!(
                "'{letters}' is not a column reference"
            )));
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
        num = num
            .checked_mul(26)
            .and_then(|n| n.checked_add(digit))
            .filter(|n| *n <= MAX_COLUMNS)
            .ok_or_else(|| EodError::Address(format!("column '{letters}' is out of range")))?;
    }

    Ok(num)
}

/// A column given by its letters in configuration files ("A", "H")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnRef(pub(crate) u32);

impl ColumnRef {
    pub fn new(col: u32) -> EodResult<Self> {
        if col == 0 || col > MAX_COLUMNS {
            return Err(EodError::Address(format!("column {col} is out of range")));
        }
        Ok(Self(col))
    }

    pub fn number(self) -> u32 {
        self.0
    }
}

impl FromStr for ColumnRef {
    type Err = EodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        column_number(s).map(Self)
    }
}

impl TryFrom<String> for ColumnRef {
    type Error = EodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColumnRef> for String {
    fn from(value: ColumnRef) -> Self {
        column_letter(value.0)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&column_letter(self.0))
    }
}

/// A single cell reference such as `C10`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub fn new(row: u32, col: u32) -> EodResult<Self> {
        if row == 0 || row > MAX_ROWS {
            return Err(EodError::Address(format!("row {row} is out of range")));
        }
        ColumnRef::new(col)?;
        Ok(Self { row, col })
    }
}

impl FromStr for CellRef {
    type Err = EodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Absolute markers ($C$10) are accepted and ignored
        let cleaned: String = s.trim().chars().filter(|c| *c != '$').collect();
        let split = cleaned
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| EodError::Address(format!("'{s}' has no row number")))?;
        let (letters, digits) = cleaned.split_at(split);

        let col = column_number(letters)?;
        let row: u32 = digits
            .parse()
            .map_err(|_| EodError::Address(format!("'{s}' has an invalid row number")))?;

        Self::new(row, col)
    }
}

impl TryFrom<String> for CellRef {
    type Error = EodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellRef> for String {
    fn from(value: CellRef) -> Self {
        value.to_string()
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letter(self.col), self.row)
    }
}

/// A rectangular merged range, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MergeRange {
    pub first_row: u32,
    pub first_col: u32,
    pub last_row: u32,
    pub last_col: u32,
}

impl MergeRange {
    /// Build a range from two corners given in any order
    pub fn new(first_row: u32, first_col: u32, last_row: u32, last_col: u32) -> Self {
        Self {
            first_row: first_row.min(last_row),
            first_col: first_col.min(last_col),
            last_row: first_row.max(last_row),
            last_col: first_col.max(last_col),
        }
    }

    /// True when both rectangles share at least one cell
    pub fn overlaps(&self, other: &MergeRange) -> bool {
        self.first_row <= other.last_row
            && other.first_row <= self.last_row
            && self.first_col <= other.last_col
            && other.first_col <= self.last_col
    }

    /// True when this range lies entirely inside the given rows and columns
    pub fn within(&self, rows: (u32, u32), cols: (u32, u32)) -> bool {
        self.first_row >= rows.0
            && self.last_row <= rows.1
            && self.first_col >= cols.0
            && self.last_col <= cols.1
    }

    /// The same range moved down by `delta` rows
    pub fn offset_rows(&self, delta: u32) -> Self {
        Self {
            first_row: self.first_row + delta,
            last_row: self.last_row + delta,
            ..*self
        }
    }

    /// Top-left cell, the one that carries the merged value
    pub fn anchor(&self) -> (u32, u32) {
        (self.first_row, self.first_col)
    }
}

impl FromStr for MergeRange {
    type Err = EodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = match s.split_once(':') {
            Some((start, end)) => (start, end),
            None => (s, s),
        };
        let start: CellRef = start.parse()?;
        let end: CellRef = end.parse()?;
        Ok(Self::new(start.row, start.col, end.row, end.col))
    }
}

impl fmt::Display for MergeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            column_letter(self.first_col),
            self.first_row,
            column_letter(self.last_col),
            self.last_row
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(52), "AZ");
        assert_eq!(column_letter(53), "BA");
        assert_eq!(column_letter(703), "AAA");
        assert_eq!(column_letter(MAX_COLUMNS), "XFD");
    }

    #[test]
    fn test_column_number() {
        assert_eq!(column_number("A").unwrap(), 1);
        assert_eq!(column_number("h").unwrap(), 8);
        assert_eq!(column_number("AA").unwrap(), 27);
        assert_eq!(column_number("XFD").unwrap(), MAX_COLUMNS);
        assert!(column_number("").is_err());
        assert!(column_number("A1").is_err());
        assert!(column_number("XFE").is_err());
    }

    #[test]
    fn test_cell_ref_parse() {
        let cell: CellRef = "C10".parse().unwrap();
        assert_eq!(cell, CellRef { row: 10, col: 3 });
        assert_eq!(cell.to_string(), "C10");

        let absolute: CellRef = "$AB$7".parse().unwrap();
        assert_eq!(absolute, CellRef { row: 7, col: 28 });

        assert!("C".parse::<CellRef>().is_err());
        assert!("10".parse::<CellRef>().is_err());
        assert!("C0".parse::<CellRef>().is_err());
    }

    #[test]
    fn test_merge_range_parse_and_display() {
        let range: MergeRange = "C18:A17".parse().unwrap();
        assert_eq!(range, MergeRange::new(17, 1, 18, 3));
        assert_eq!(range.to_string(), "A17:C18");

        let single: MergeRange = "B4".parse().unwrap();
        assert_eq!(single.anchor(), (4, 2));
    }

    #[test]
    fn test_merge_range_overlap() {
        let a = MergeRange::new(17, 1, 17, 3);
        let b = MergeRange::new(17, 3, 18, 4);
        let c = MergeRange::new(18, 1, 18, 2);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(!b.overlaps(&c));
    }

    #[test]
    fn test_merge_range_offset_and_within() {
        let range = MergeRange::new(17, 1, 17, 3);
        let moved = range.offset_rows(9);
        assert_eq!(moved, MergeRange::new(26, 1, 26, 3));
        assert!(range.within((17, 25), (1, 8)));
        assert!(!moved.within((17, 25), (1, 8)));
    }
}
