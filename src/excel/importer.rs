//! Dispatch importer - dispatch spreadsheet (.xlsx/.xls/.ods) or JSON → DispatchData

use crate::error::{EodError, EodResult};
use crate::types::{DispatchData, DispatchRow, DispatchSheet, FieldValue};
use calamine::{open_workbook_auto, Data, Range, Reader, Xlsx};
use std::fmt::Display;
use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads dispatch files into column-keyed rows
pub struct DispatchImporter {
    path: PathBuf,
}

impl DispatchImporter {
    /// Create a new dispatch importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Import the file; `.json` files are taken as already-parsed dispatch data
    pub fn import(&self) -> EodResult<DispatchData> {
        let is_json = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            let content = fs::read_to_string(&self.path)?;
            return Ok(serde_json::from_str(&content)?);
        }

        let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
            EodError::Import(format!(
                "Failed to open dispatch file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        read_sheets(&mut workbook)
    }

    /// Import an uploaded .xlsx held in memory
    pub fn from_xlsx_bytes(bytes: Vec<u8>) -> EodResult<DispatchData> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| EodError::Import(format!("Failed to read dispatch workbook: {}", e)))?;
        read_sheets(&mut workbook)
    }
}

/// Collect every readable worksheet; unreadable ones are logged and skipped
fn read_sheets<RS, R>(workbook: &mut R) -> EodResult<DispatchData>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: Display,
{
    let mut data = DispatchData::new();
    let sheet_names = workbook.sheet_names().to_vec();

    for sheet_name in sheet_names {
        match workbook.worksheet_range(&sheet_name) {
            Ok(range) => {
                let sheet = sheet_from_range(&sheet_name, &range);
                debug!(sheet = %sheet_name, rows = sheet.rows.len(), "read dispatch sheet");
                data.add_sheet(sheet);
            }
            Err(e) => warn!(sheet = %sheet_name, error = %e, "skipping unreadable dispatch sheet"),
        }
    }

    Ok(data)
}

/// First row is the header; each later non-blank row becomes a field map
fn sheet_from_range(sheet_name: &str, range: &Range<Data>) -> DispatchSheet {
    let mut sheet = DispatchSheet::new(sheet_name);
    let mut rows = range.rows();

    let headers: Vec<Option<String>> = match rows.next() {
        Some(header_row) => header_row.iter().map(header_name).collect(),
        None => return sheet, // Empty sheet
    };

    for cells in rows {
        let row: DispatchRow = headers
            .iter()
            .zip(cells.iter())
            .filter_map(|(header, cell)| {
                header
                    .as_ref()
                    .map(|name| (name.clone(), field_value(cell)))
            })
            .collect();

        if row.values().all(|v| matches!(v, FieldValue::Empty)) {
            continue;
        }
        sheet.rows.push(row);
    }

    sheet
}

/// Header text of a column, `None` for blank header cells
fn header_name(cell: &Data) -> Option<String> {
    let name = match cell {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    Some(name).filter(|n| !n.is_empty())
}

fn field_value(cell: &Data) -> FieldValue {
    match cell {
        Data::Empty => FieldValue::Empty,
        Data::String(s) => FieldValue::Text(s.clone()),
        Data::Int(i) => FieldValue::Number(*i as f64),
        Data::Float(f) => FieldValue::Number(*f),
        Data::Bool(b) => FieldValue::Bool(*b),
        other => FieldValue::Text(other.to_string()),
    }
}
