use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

//==============================================================================
// Dispatch Input
//==============================================================================

/// One field of a parsed dispatch row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Non-empty trimmed text, if this field is text
    pub fn as_name(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.trim()).filter(|s| !s.is_empty()),
            _ => None,
        }
    }

    /// Value as a non-negative integer count, if it is one.
    ///
    /// Accepts whole numbers and text such as `" 12 "` or `"3.0"`; rejects
    /// negatives, fractions, booleans and anything unparsable.
    pub fn as_count(&self) -> Option<u64> {
        match self {
            FieldValue::Number(n) => whole_non_negative(*n),
            FieldValue::Text(s) => {
                let s = s.trim();
                s.parse::<u64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(whole_non_negative))
            }
            FieldValue::Empty | FieldValue::Bool(_) => None,
        }
    }
}

fn whole_non_negative(n: f64) -> Option<u64> {
    if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64 {
        Some(n as u64)
    } else {
        None
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

/// Column header → field
pub type DispatchRow = IndexMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DispatchSheet {
    pub name: String,
    #[serde(default)]
    pub rows: Vec<DispatchRow>,
}

impl DispatchSheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<K, V, I>(&mut self, fields: I)
    where
        K: Into<String>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.rows.push(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
    }
}

/// Parsed dispatch workbook: worksheets → rows → column-keyed fields
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DispatchData {
    #[serde(default)]
    pub sheets: Vec<DispatchSheet>,
}

impl DispatchData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(&mut self, sheet: DispatchSheet) {
        self.sheets.push(sheet);
    }

    pub fn row_count(&self) -> usize {
        self.sheets.iter().map(|s| s.rows.len()).sum()
    }
}

//==============================================================================
// Tour Records
//==============================================================================

/// Aggregated passenger counts for one tour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourRecord {
    pub tour_name: String,
    pub adult_count: u64,
    pub child_count: u64,
}

impl TourRecord {
    pub fn new(tour_name: impl Into<String>, adult_count: u64, child_count: u64) -> Self {
        Self {
            tour_name: tour_name.into(),
            adult_count,
            child_count,
        }
    }
}

/// Records keyed by tour name, in order of first occurrence
pub type RecordSet = IndexMap<String, TourRecord>;

//==============================================================================
// Template
//==============================================================================

/// The repeatable row range of the template, 1-based and inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateBlock {
    pub start_row: u32,
    pub end_row: u32,
    pub first_col: u32,
    pub last_col: u32,
}

impl TemplateBlock {
    pub fn height(&self) -> u32 {
        self.end_row - self.start_row + 1
    }

    /// Columns covered, as an inclusive pair
    pub fn column_span(&self) -> (u32, u32) {
        (self.first_col, self.last_col)
    }

    /// First row of the section holding record `index` (0 = the template itself)
    pub fn section_start(&self, index: u32) -> u32 {
        if index == 0 {
            self.start_row
        } else {
            self.end_row + 1 + (index - 1) * self.height()
        }
    }
}

/// Which record field a placeholder binds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    TourName,
    AdultCount,
    ChildCount,
}

impl fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaceholderKind::TourName => "tour name",
            PlaceholderKind::AdultCount => "adult count",
            PlaceholderKind::ChildCount => "child count",
        };
        f.write_str(name)
    }
}

/// A template cell whose whole value is a placeholder token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderToken {
    pub row: u32,
    pub col: u32,
    pub kind: PlaceholderKind,
}

//==============================================================================
// Run Output
//==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub adult: u64,
    pub child: u64,
}

/// Where one record's section ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionPlacement {
    pub tour_name: String,
    pub start_row: u32,
    pub end_row: u32,
}

/// What a run produced, for callers that report back to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub records: Vec<TourRecord>,
    pub sections: Vec<SectionPlacement>,
    pub totals: Totals,
}
