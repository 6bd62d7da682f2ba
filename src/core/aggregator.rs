//! Report totals and the finalize step

use super::context::ReportContext;
use crate::config::ReportDateLayout;
use crate::error::{EodError, EodResult};
use crate::types::{TourRecord, Totals};
use chrono::NaiveDate;
use std::fmt::Write as _;
use tracing::info;

impl Totals {
    /// Sum counts over the aggregated records (never over bound cells)
    pub fn from_records<'r, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'r TourRecord>,
    {
        records.into_iter().fold(Totals::default(), |acc, r| Totals {
            adult: acc.adult.saturating_add(r.adult_count),
            child: acc.child.saturating_add(r.child_count),
        })
    }
}

/// Write the totals (and the report date, when configured) into their fixed
/// cells. Cell styles are left as the template has them, and writing twice
/// gives the same sheet.
pub fn finalize(ctx: &mut ReportContext, totals: Totals, date: NaiveDate) -> EodResult<()> {
    let layout = ctx.layout();
    let sheet = ctx.sheet_mut();

    let adult = layout.totals.adult;
    let child = layout.totals.child;
    sheet.set_value(adult.row, adult.col, totals.adult);
    sheet.set_value(child.row, child.col, totals.child);

    if let Some(date_layout) = &layout.report_date {
        let text = format_report_date(date, date_layout)?;
        sheet.set_value(date_layout.cell.row, date_layout.cell.col, text);
    }

    info!(
        total_adult = totals.adult,
        total_child = totals.child,
        "wrote report totals"
    );
    Ok(())
}

/// Render the date with the layout's chrono format
pub fn format_report_date(date: NaiveDate, layout: &ReportDateLayout) -> EodResult<String> {
    let mut text = String::new();
    write!(text, "{}", date.format(&layout.format)).map_err(|_| {
        EodError::Layout(format!("invalid report date format '{}'", layout.format))
    })?;
    Ok(text)
}
