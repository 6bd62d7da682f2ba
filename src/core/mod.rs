//! Report generation: extract → locate → clear → replicate/bind → finalize

pub mod aggregator;
pub mod context;
pub mod extractor;
pub mod locator;
pub mod replicator;

pub use aggregator::finalize;
pub use context::{BlockSnapshot, ReportContext};
pub use extractor::RecordExtractor;
pub use locator::{LocatedBlock, TemplateLocator};
pub use replicator::{bind_section, clear_overflow, clone_section, SectionReplicator};

use crate::config::ReportLayout;
use crate::error::{EodError, EodResult};
use crate::types::{DispatchData, RecordSet, ReportSummary, Totals};
use crate::workbook::{Workbook, MAX_ROWS};
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

/// Fills a report template from dispatch data.
///
/// One generator can serve many runs; every run works on the workbook it is
/// handed and keeps no state between calls.
pub struct ReportGenerator {
    layout: ReportLayout,
    report_date: Option<NaiveDate>,
}

impl ReportGenerator {
    pub fn new(layout: ReportLayout) -> Self {
        Self {
            layout,
            report_date: None,
        }
    }

    /// Fix the date written to the report date cell (defaults to today)
    #[must_use]
    pub fn with_report_date(mut self, date: NaiveDate) -> Self {
        self.report_date = Some(date);
        self
    }

    pub fn layout(&self) -> &ReportLayout {
        &self.layout
    }

    /// Aggregate dispatch rows into tour records
    pub fn extract(&self, data: &DispatchData) -> EodResult<RecordSet> {
        RecordExtractor::new(&self.layout.aliases).extract(data)
    }

    /// Validate the template against the layout without touching it
    pub fn locate(&self, workbook: &Workbook) -> EodResult<LocatedBlock> {
        TemplateLocator::new(&self.layout).locate(workbook)
    }

    /// Full run: extract records, then fill the template in place.
    ///
    /// Any error is returned before the workbook is modified.
    pub fn generate(&self, data: &DispatchData, workbook: &mut Workbook) -> EodResult<ReportSummary> {
        let records = self.extract(data)?;
        self.fill(&records, workbook)
    }

    /// Fill the template with already-extracted records
    pub fn fill(&self, records: &RecordSet, workbook: &mut Workbook) -> EodResult<ReportSummary> {
        self.layout.validate()?;
        let located = self.locate(workbook)?;
        let block = located.block;
        check_row_limit(block.section_start(0), block.height(), records.len())?;

        let sheet = workbook.sheet_mut(&located.sheet_name).ok_or_else(|| {
            EodError::TemplateConfig(format!("sheet '{}' disappeared", located.sheet_name))
        })?;

        // Mutation starts here; nothing below may fail on bad input
        let mut ctx = ReportContext::new(sheet, &self.layout, block);
        clear_overflow(&mut ctx);
        SectionReplicator::place_sections(&mut ctx, records.values());

        let totals = Totals::from_records(records.values());
        let date = self
            .report_date
            .unwrap_or_else(|| Local::now().date_naive());
        finalize(&mut ctx, totals, date)?;

        if ctx.style_anomalies() > 0 {
            warn!(
                anomalies = ctx.style_anomalies(),
                "report generated with formatting anomalies"
            );
        }
        info!(
            sheet = %located.sheet_name,
            records = records.len(),
            "report generated"
        );

        Ok(ReportSummary {
            records: records.values().cloned().collect(),
            sections: ctx.into_placements(),
            totals,
        })
    }
}

/// Refuse runs whose last section would run past the worksheet's last row
fn check_row_limit(start_row: u32, height: u32, sections: usize) -> EodResult<()> {
    let sections = sections.max(1) as u64;
    let last_row = start_row as u64 + sections * height as u64 - 1;
    if last_row > MAX_ROWS as u64 {
        return Err(EodError::InputShape(format!(
            "{sections} tours need rows up to {last_row}, past the worksheet limit of {MAX_ROWS}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_limit() {
        assert!(check_row_limit(17, 9, 3).is_ok());
        assert!(check_row_limit(17, 9, 0).is_ok());
        assert!(check_row_limit(17, 9, 200_000).is_err());
        assert!(check_row_limit(MAX_ROWS - 8, 9, 1).is_ok());
        assert!(check_row_limit(MAX_ROWS - 8, 9, 2).is_err());
    }
}
