//! Template section location and validation

use crate::config::ReportLayout;
use crate::error::{EodError, EodResult};
use crate::types::{PlaceholderToken, TemplateBlock};
use crate::workbook::{CellValue, Workbook, Worksheet};
use tracing::debug;

/// The validated block plus the placeholders found in it
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedBlock {
    pub sheet_name: String,
    pub block: TemplateBlock,
    pub placeholders: Vec<PlaceholderToken>,
}

/// Validates the configured block against an actual template.
///
/// The block position comes from the layout; nothing is auto-detected.
/// Locating only confirms that the configured rows hold at least one
/// placeholder token. Trailing rows of the block may be entirely empty.
pub struct TemplateLocator<'a> {
    layout: &'a ReportLayout,
}

impl<'a> TemplateLocator<'a> {
    pub fn new(layout: &'a ReportLayout) -> Self {
        Self { layout }
    }

    pub fn locate(&self, workbook: &Workbook) -> EodResult<LocatedBlock> {
        if workbook.sheet_count() == 0 {
            return Err(EodError::InputShape(
                "template workbook contains no worksheets".to_string(),
            ));
        }

        let sheet = match self.layout.sheet.as_deref() {
            Some(name) => workbook.sheet(name).ok_or_else(|| {
                EodError::TemplateConfig(format!("template has no worksheet named '{name}'"))
            })?,
            None => workbook
                .first_sheet()
                .ok_or_else(|| EodError::InputShape("template has no worksheets".to_string()))?,
        };

        self.locate_in_sheet(sheet)
    }

    pub fn locate_in_sheet(&self, sheet: &Worksheet) -> EodResult<LocatedBlock> {
        let block = self.layout.template_block();
        if block.end_row <= block.start_row {
            return Err(EodError::TemplateConfig(format!(
                "block rows {}-{} do not form a repeatable section",
                block.start_row, block.end_row
            )));
        }

        let placeholders = self.scan_placeholders(sheet, &block);
        if placeholders.is_empty() {
            let expected = self.layout.tokens.all().join(", ");
            return Err(EodError::TemplateConfig(format!(
                "no placeholder found in rows {}-{} of sheet '{}'; expected at least one of {}",
                block.start_row,
                block.end_row,
                sheet.name(),
                expected
            )));
        }

        debug!(
            sheet = sheet.name(),
            start_row = block.start_row,
            end_row = block.end_row,
            placeholders = placeholders.len(),
            "located template block"
        );

        Ok(LocatedBlock {
            sheet_name: sheet.name().to_string(),
            block,
            placeholders,
        })
    }

    /// Every cell in the block whose whole text equals a token
    pub fn scan_placeholders(
        &self,
        sheet: &Worksheet,
        block: &TemplateBlock,
    ) -> Vec<PlaceholderToken> {
        let (first_col, last_col) = block.column_span();
        let mut found = Vec::new();

        for row in block.start_row..=block.end_row {
            for (col, cell) in sheet.row_cells(row, first_col, last_col) {
                if let CellValue::Text(text) = &cell.value {
                    if let Some(kind) = self.layout.tokens.classify(text) {
                        found.push(PlaceholderToken { row, col, kind });
                    }
                }
            }
        }

        found
    }
}
