//! Report layout configuration
//!
//! The template layout is a contract with the template author: the block
//! rows, the column span, the placeholder vocabulary and the summary cells
//! are fixed per report type and never discovered at runtime. The defaults
//! describe the canonical EOD template; a YAML file can override any part.
//!
//! ```yaml
//! sheet: EOD
//! block:
//!   start_row: 17
//!   end_row: 25
//!   first_column: A
//!   last_column: H
//! totals:
//!   adult: C10
//!   child: E10
//! ```

use crate::error::{EodError, EodResult};
use crate::types::{PlaceholderKind, TemplateBlock};
use crate::workbook::{CellRef, ColumnRef, MAX_ROWS};
use crate::core::aggregator::format_report_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Row range and column span of the repeatable tour block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlockLayout {
    pub start_row: u32,
    pub end_row: u32,
    pub first_column: ColumnRef,
    pub last_column: ColumnRef,
}

impl Default for BlockLayout {
    fn default() -> Self {
        Self {
            start_row: 17,
            end_row: 25,
            first_column: ColumnRef(1),
            last_column: ColumnRef(8),
        }
    }
}

/// The placeholder vocabulary; cells must equal these strings exactly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenSet {
    pub tour_name: String,
    pub num_adult: String,
    pub num_chd: String,
}

impl Default for TokenSet {
    fn default() -> Self {
        Self {
            tour_name: "{{tour_name}}".to_string(),
            num_adult: "{{num_adult}}".to_string(),
            num_chd: "{{num_chd}}".to_string(),
        }
    }
}

impl TokenSet {
    /// Which field a cell text binds to, by exact whole-value match
    pub fn classify(&self, text: &str) -> Option<PlaceholderKind> {
        if text == self.tour_name {
            Some(PlaceholderKind::TourName)
        } else if text == self.num_adult {
            Some(PlaceholderKind::AdultCount)
        } else if text == self.num_chd {
            Some(PlaceholderKind::ChildCount)
        } else {
            None
        }
    }

    pub fn all(&self) -> [&str; 3] {
        [&self.tour_name, &self.num_adult, &self.num_chd]
    }
}

/// Cells receiving the report-level totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TotalsLayout {
    pub adult: CellRef,
    pub child: CellRef,
}

impl Default for TotalsLayout {
    fn default() -> Self {
        Self {
            adult: CellRef { row: 10, col: 3 },
            child: CellRef { row: 10, col: 5 },
        }
    }
}

/// Optional cell receiving the run date as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportDateLayout {
    pub cell: CellRef,
    /// chrono format string
    #[serde(default = "default_date_format")]
    pub format: String,
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

/// Prioritized header aliases probed when reading dispatch rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AliasConfig {
    pub tour_name: Vec<String>,
    pub adult: Vec<String>,
    pub child: Vec<String>,
}

impl Default for AliasConfig {
    fn default() -> Self {
        fn owned(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| (*s).to_string()).collect()
        }
        Self {
            tour_name: owned(&[
                "Tour",
                "Tour Name",
                "TourName",
                "tour_name",
                "Product",
                "Product Name",
                "Activity",
                "Service",
            ]),
            adult: owned(&[
                "Adult",
                "Adults",
                "No. of Adults",
                "Adult Pax",
                "num_adult",
                "ADT",
            ]),
            child: owned(&[
                "Child",
                "Children",
                "Kids",
                "No. of Children",
                "Child Pax",
                "num_chd",
                "CHD",
            ]),
        }
    }
}

/// Complete layout of one report type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportLayout {
    /// Worksheet holding the block; first sheet when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    pub block: BlockLayout,
    pub tokens: TokenSet,
    pub totals: TotalsLayout,
    /// Rows below the block cleared before placing sections
    pub overflow_rows: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_date: Option<ReportDateLayout>,
    pub aliases: AliasConfig,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            sheet: None,
            block: BlockLayout::default(),
            tokens: TokenSet::default(),
            totals: TotalsLayout::default(),
            overflow_rows: 500,
            report_date: None,
            aliases: AliasConfig::default(),
        }
    }
}

impl ReportLayout {
    /// Load and validate a layout file
    pub fn from_file(path: &Path) -> EodResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> EodResult<Self> {
        // An empty document means "all defaults"
        let layout: ReportLayout = if content.trim().is_empty() {
            ReportLayout::default()
        } else {
            serde_yaml::from_str(content)?
        };
        layout.validate()?;
        Ok(layout)
    }

    pub fn to_yaml(&self) -> EodResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// The configured block as row/column numbers
    pub fn template_block(&self) -> TemplateBlock {
        TemplateBlock {
            start_row: self.block.start_row,
            end_row: self.block.end_row,
            first_col: self.block.first_column.number(),
            last_col: self.block.last_column.number(),
        }
    }

    /// Last row touched by the overflow clear
    pub fn overflow_end(&self) -> u32 {
        self.block
            .end_row
            .saturating_add(self.overflow_rows)
            .min(MAX_ROWS)
    }

    /// Check the layout is internally consistent
    pub fn validate(&self) -> EodResult<()> {
        let block = &self.block;
        if block.start_row == 0 {
            return Err(EodError::Layout("block rows are 1-based".to_string()));
        }
        if block.end_row <= block.start_row {
            return Err(EodError::Layout(format!(
                "block end row {} must be greater than start row {}",
                block.end_row, block.start_row
            )));
        }
        if block.end_row > MAX_ROWS {
            return Err(EodError::Layout(format!(
                "block end row {} exceeds the worksheet limit",
                block.end_row
            )));
        }
        if block.last_column < block.first_column {
            return Err(EodError::Layout(format!(
                "block columns {}..{} are reversed",
                block.first_column, block.last_column
            )));
        }

        let tokens = self.tokens.all();
        if tokens.iter().any(|t| t.is_empty()) {
            return Err(EodError::Layout("placeholder tokens must not be empty".to_string()));
        }
        if tokens[0] == tokens[1] || tokens[0] == tokens[2] || tokens[1] == tokens[2] {
            return Err(EodError::Layout("placeholder tokens must be distinct".to_string()));
        }

        // Totals live in the fixed part of the layout; anything at or below
        // the block inside its span is overwritten by sections
        let (first_col, last_col) = self.template_block().column_span();
        for (label, cell) in [("adult", self.totals.adult), ("child", self.totals.child)] {
            if cell.row >= block.start_row && cell.col >= first_col && cell.col <= last_col {
                return Err(EodError::Layout(format!(
                    "{label} total cell {cell} lies inside the repeating section area"
                )));
            }
        }
        if self.totals.adult == self.totals.child {
            return Err(EodError::Layout("total cells must differ".to_string()));
        }
        if let Some(date) = &self.report_date {
            // Time and offset specifiers parse but cannot render a plain date
            format_report_date(NaiveDate::default(), date)?;
            if date.cell.row >= block.start_row
                && date.cell.col >= first_col
                && date.cell.col <= last_col
            {
                return Err(EodError::Layout(format!(
                    "report date cell {} lies inside the repeating section area",
                    date.cell
                )));
            }
        }

        let aliases = &self.aliases;
        if aliases.tour_name.is_empty() || aliases.adult.is_empty() || aliases.child.is_empty() {
            return Err(EodError::Layout("alias lists must not be empty".to_string()));
        }

        Ok(())
    }
}
