//! In-memory spreadsheet model
//!
//! Just enough of the workbook domain to fill a report template: sparse
//! cells with values and styles, merged ranges, row heights and column
//! widths. Loading and saving live in `crate::excel`.

pub mod address;
pub mod style;

pub use address::{column_letter, column_number, CellRef, ColumnRef, MergeRange, MAX_ROWS};
pub use style::{AlignmentStyle, BorderSide, Borders, CellStyle, FillStyle, FontStyle};

use crate::error::{EodError, EodResult};
use std::collections::BTreeMap;

//==============================================================================
// Cells
//==============================================================================

/// Literal content of a cell. Formulas are carried as text and never evaluated.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Formula(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<u64> for CellValue {
    fn from(value: u64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// A value together with its formatting
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    pub value: CellValue,
    pub style: CellStyle,
}

impl Cell {
    pub fn new(value: impl Into<CellValue>, style: CellStyle) -> Self {
        Self {
            value: value.into(),
            style,
        }
    }

    /// Nothing worth serializing: no value and no formatting
    pub fn is_blank(&self) -> bool {
        self.value.is_empty() && self.style.is_default()
    }
}

//==============================================================================
// Worksheet
//==============================================================================

/// One worksheet; rows and columns are 1-based
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Worksheet {
    name: String,
    cells: BTreeMap<(u32, u32), Cell>,
    merges: Vec<MergeRange>,
    row_heights: BTreeMap<u32, f64>,
    column_widths: BTreeMap<u32, f64>,
}

static EMPTY_VALUE: CellValue = CellValue::Empty;

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Mutable access, creating an empty unstyled cell when absent
    pub fn cell_mut(&mut self, row: u32, col: u32) -> &mut Cell {
        self.cells.entry((row, col)).or_default()
    }

    /// Value at a coordinate; absent cells read as `Empty`
    pub fn value(&self, row: u32, col: u32) -> &CellValue {
        self.cell(row, col).map_or(&EMPTY_VALUE, |cell| &cell.value)
    }

    /// Style at a coordinate, if the cell exists
    pub fn style(&self, row: u32, col: u32) -> Option<&CellStyle> {
        self.cell(row, col).map(|cell| &cell.style)
    }

    pub fn set_value(&mut self, row: u32, col: u32, value: impl Into<CellValue>) {
        self.cell_mut(row, col).value = value.into();
    }

    pub fn set_style(&mut self, row: u32, col: u32, style: CellStyle) {
        self.cell_mut(row, col).style = style;
    }

    /// Replace value and style together
    pub fn set_cell(&mut self, row: u32, col: u32, cell: Cell) {
        self.cells.insert((row, col), cell);
    }

    /// Blank the value but keep the formatting
    pub fn clear_value(&mut self, row: u32, col: u32) {
        if let Some(cell) = self.cells.get_mut(&(row, col)) {
            cell.value = CellValue::Empty;
        }
    }

    pub fn remove_cell(&mut self, row: u32, col: u32) -> Option<Cell> {
        self.cells.remove(&(row, col))
    }

    /// Blank every non-empty value inside the rectangle, keeping styles.
    /// Returns how many cells were cleared.
    pub fn clear_values(&mut self, rows: (u32, u32), cols: (u32, u32)) -> usize {
        let mut cleared = 0;
        for ((_, col), cell) in self.cells.range_mut((rows.0, 0)..=(rows.1, u32::MAX)) {
            if *col >= cols.0 && *col <= cols.1 && !cell.value.is_empty() {
                cell.value = CellValue::Empty;
                cleared += 1;
            }
        }
        cleared
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = ((u32, u32), &Cell)> {
        self.cells.iter().map(|(coord, cell)| (*coord, cell))
    }

    /// Cells of one row between two columns, inclusive
    pub fn row_cells(
        &self,
        row: u32,
        first_col: u32,
        last_col: u32,
    ) -> impl Iterator<Item = (u32, &Cell)> {
        self.cells
            .range((row, first_col)..=(row, last_col))
            .map(|((_, col), cell)| (*col, cell))
    }

    /// Highest row holding a cell, a merge or a custom height (0 when empty)
    pub fn max_row(&self) -> u32 {
        let from_cells = self.cells.keys().map(|(row, _)| *row).max().unwrap_or(0);
        let from_merges = self.merges.iter().map(|m| m.last_row).max().unwrap_or(0);
        let from_heights = self.row_heights.keys().next_back().copied().unwrap_or(0);
        from_cells.max(from_merges).max(from_heights)
    }

    /// Highest column holding a cell or a merge (0 when empty)
    pub fn max_col(&self) -> u32 {
        let from_cells = self.cells.keys().map(|(_, col)| *col).max().unwrap_or(0);
        let from_merges = self.merges.iter().map(|m| m.last_col).max().unwrap_or(0);
        from_cells.max(from_merges)
    }

    pub fn merges(&self) -> &[MergeRange] {
        &self.merges
    }

    /// Register a merged range. Overlapping merges are rejected because
    /// the file format cannot represent them.
    pub fn add_merge(&mut self, range: MergeRange) -> EodResult<()> {
        if let Some(existing) = self.merges.iter().find(|m| m.overlaps(&range)) {
            return Err(EodError::Layout(format!(
                "merge {range} overlaps existing merge {existing} on sheet '{}'",
                self.name
            )));
        }
        self.merges.push(range);
        Ok(())
    }

    /// Drop every merge lying entirely inside the rectangle; returns how many went
    pub fn remove_merges_within(&mut self, rows: (u32, u32), cols: (u32, u32)) -> usize {
        let before = self.merges.len();
        self.merges.retain(|m| !m.within(rows, cols));
        before - self.merges.len()
    }

    pub fn row_height(&self, row: u32) -> Option<f64> {
        self.row_heights.get(&row).copied()
    }

    pub fn set_row_height(&mut self, row: u32, height: Option<f64>) {
        match height {
            Some(h) => {
                self.row_heights.insert(row, h);
            }
            None => {
                self.row_heights.remove(&row);
            }
        }
    }

    /// Drop custom heights for every row in the inclusive range
    pub fn clear_row_heights(&mut self, rows: (u32, u32)) -> usize {
        let before = self.row_heights.len();
        self.row_heights.retain(|row, _| *row < rows.0 || *row > rows.1);
        before - self.row_heights.len()
    }

    pub fn row_heights(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.row_heights.iter().map(|(row, h)| (*row, *h))
    }

    pub fn column_width(&self, col: u32) -> Option<f64> {
        self.column_widths.get(&col).copied()
    }

    pub fn set_column_width(&mut self, col: u32, width: f64) {
        self.column_widths.insert(col, width);
    }

    pub fn column_widths(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.column_widths.iter().map(|(col, w)| (*col, *w))
    }
}

//==============================================================================
// Workbook
//==============================================================================

/// Ordered collection of worksheets.
///
/// `Clone` copies every sheet, cell and style; hand each run its own clone.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    sheets: Vec<Worksheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(&mut self, sheet: Worksheet) -> &mut Worksheet {
        self.sheets.push(sheet);
        let last = self.sheets.len() - 1;
        &mut self.sheets[last]
    }

    pub fn sheets(&self) -> &[Worksheet] {
        &self.sheets
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    pub fn first_sheet(&self) -> Option<&Worksheet> {
        self.sheets.first()
    }

    pub fn first_sheet_mut(&mut self) -> Option<&mut Worksheet> {
        self.sheets.first_mut()
    }

    /// Named sheet, or the first one when no name is given
    pub fn resolve_sheet_mut(&mut self, name: Option<&str>) -> Option<&mut Worksheet> {
        match name {
            Some(name) => self.sheet_mut(name),
            None => self.first_sheet_mut(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_cell_reads_empty() {
        let sheet = Worksheet::new("EOD");
        assert_eq!(sheet.value(3, 3), &CellValue::Empty);
        assert!(sheet.style(3, 3).is_none());
        assert_eq!(sheet.max_row(), 0);
    }

    #[test]
    fn test_clear_value_keeps_style() {
        let mut sheet = Worksheet::new("EOD");
        let style = CellStyle::default().with_bold(true);
        sheet.set_cell(5, 2, Cell::new("stale", style.clone()));

        sheet.clear_value(5, 2);

        assert!(sheet.value(5, 2).is_empty());
        assert_eq!(sheet.style(5, 2), Some(&style));
    }

    #[test]
    fn test_clear_values_rectangle() {
        let mut sheet = Worksheet::new("EOD");
        sheet.set_value(25, 1, "last block row");
        sheet.set_value(26, 1, "stale");
        sheet.set_value(40, 8, "stale");
        sheet.set_value(40, 9, "outside span");
        sheet.set_value(600, 1, "below bound");

        let cleared = sheet.clear_values((26, 525), (1, 8));

        assert_eq!(cleared, 2);
        assert!(!sheet.value(25, 1).is_empty());
        assert!(sheet.value(26, 1).is_empty());
        assert!(sheet.value(40, 8).is_empty());
        assert!(!sheet.value(40, 9).is_empty());
        assert!(!sheet.value(600, 1).is_empty());
    }

    #[test]
    fn test_row_cells_range() {
        let mut sheet = Worksheet::new("EOD");
        sheet.set_value(2, 1, "a");
        sheet.set_value(2, 3, "c");
        sheet.set_value(2, 9, "outside");
        sheet.set_value(3, 2, "next row");

        let cols: Vec<u32> = sheet.row_cells(2, 1, 8).map(|(col, _)| col).collect();
        assert_eq!(cols, vec![1, 3]);
    }

    #[test]
    fn test_add_merge_rejects_overlap() {
        let mut sheet = Worksheet::new("EOD");
        sheet.add_merge(MergeRange::new(1, 1, 1, 3)).unwrap();
        assert!(sheet.add_merge(MergeRange::new(1, 3, 2, 4)).is_err());
        assert!(sheet.add_merge(MergeRange::new(2, 1, 2, 2)).is_ok());
        assert_eq!(sheet.merges().len(), 2);
    }

    #[test]
    fn test_remove_merges_within() {
        let mut sheet = Worksheet::new("EOD");
        sheet.add_merge(MergeRange::new(1, 1, 1, 3)).unwrap();
        sheet.add_merge(MergeRange::new(30, 1, 30, 3)).unwrap();

        let removed = sheet.remove_merges_within((26, 100), (1, 8));

        assert_eq!(removed, 1);
        assert_eq!(sheet.merges(), &[MergeRange::new(1, 1, 1, 3)]);
    }

    #[test]
    fn test_clear_row_heights_range() {
        let mut sheet = Worksheet::new("S");
        for row in [4, 5, 9, 12] {
            sheet.set_row_height(row, Some(30.0));
        }

        assert_eq!(sheet.clear_row_heights((5, 9)), 2);
        assert_eq!(sheet.row_height(4), Some(30.0));
        assert_eq!(sheet.row_height(5), None);
        assert_eq!(sheet.row_height(12), Some(30.0));
    }

    #[test]
    fn test_max_row_counts_merges_and_heights() {
        let mut sheet = Worksheet::new("EOD");
        sheet.set_value(4, 1, "x");
        sheet.set_row_height(9, Some(20.0));
        assert_eq!(sheet.max_row(), 9);
        sheet.add_merge(MergeRange::new(10, 1, 12, 2)).unwrap();
        assert_eq!(sheet.max_row(), 12);
    }

    #[test]
    fn test_workbook_clone_is_deep() {
        let mut book = Workbook::new();
        book.add_sheet(Worksheet::new("EOD")).set_value(1, 1, "original");

        let mut copy = book.clone();
        copy.first_sheet_mut().unwrap().set_value(1, 1, "changed");

        assert_eq!(
            book.first_sheet().unwrap().value(1, 1),
            &CellValue::Text("original".to_string())
        );
    }

    #[test]
    fn test_resolve_sheet() {
        let mut book = Workbook::new();
        book.add_sheet(Worksheet::new("Cover"));
        book.add_sheet(Worksheet::new("EOD"));

        assert_eq!(book.resolve_sheet_mut(None).unwrap().name(), "Cover");
        assert_eq!(book.resolve_sheet_mut(Some("EOD")).unwrap().name(), "EOD");
        assert!(book.resolve_sheet_mut(Some("Missing")).is_none());
    }
}
