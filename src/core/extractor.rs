//! Record extraction: dispatch rows → deduplicated tour records

use crate::config::AliasConfig;
use crate::error::{EodError, EodResult};
use crate::types::{DispatchData, DispatchRow, FieldValue, RecordSet, TourRecord};
use tracing::{debug, info};

/// Turns parsed dispatch sheets into one record per distinct tour name
pub struct RecordExtractor<'a> {
    aliases: &'a AliasConfig,
}

impl<'a> RecordExtractor<'a> {
    pub fn new(aliases: &'a AliasConfig) -> Self {
        Self { aliases }
    }

    /// Extract and merge records from every row of every worksheet.
    ///
    /// Rows without a tour name, and rows whose counts are both zero, are
    /// dropped silently: dispatch sheets carry headers, blanks and notes.
    /// The only failure is a workbook with no worksheets at all.
    pub fn extract(&self, data: &DispatchData) -> EodResult<RecordSet> {
        if data.sheets.is_empty() {
            return Err(EodError::InputShape(
                "dispatch data contains no worksheets".to_string(),
            ));
        }

        let mut records = RecordSet::new();
        let mut skipped = 0usize;

        for sheet in &data.sheets {
            for row in &sheet.rows {
                match self.resolve_row(row) {
                    Some(record) => merge_record(&mut records, record),
                    None => skipped += 1,
                }
            }
        }

        info!(
            rows = data.row_count(),
            skipped,
            records = records.len(),
            "extracted tour records"
        );
        Ok(records)
    }

    /// Resolve one row into a record, or `None` when it carries no tour
    pub fn resolve_row(&self, row: &DispatchRow) -> Option<TourRecord> {
        let tour_name = self.resolve_name(row)?;
        let adult_count = self.resolve_count(row, &self.aliases.adult).unwrap_or(0);
        let child_count = self.resolve_count(row, &self.aliases.child).unwrap_or(0);

        if adult_count == 0 && child_count == 0 {
            debug!(tour = %tour_name, "dropping row with no passengers");
            return None;
        }

        Some(TourRecord {
            tour_name: tour_name.to_string(),
            adult_count,
            child_count,
        })
    }

    /// First alias holding a non-empty string
    fn resolve_name<'r>(&self, row: &'r DispatchRow) -> Option<&'r str> {
        self.aliases
            .tour_name
            .iter()
            .filter_map(|alias| lookup(row, alias))
            .find_map(FieldValue::as_name)
    }

    /// First alias whose value parses as a non-negative integer
    fn resolve_count(&self, row: &DispatchRow, aliases: &[String]) -> Option<u64> {
        aliases
            .iter()
            .filter_map(|alias| lookup(row, alias))
            .find_map(FieldValue::as_count)
    }
}

/// Find a field by header, exact match first, then trimmed and case-insensitive
fn lookup<'r>(row: &'r DispatchRow, alias: &str) -> Option<&'r FieldValue> {
    if let Some(value) = row.get(alias) {
        return Some(value);
    }
    let wanted = alias.trim();
    row.iter()
        .find(|(header, _)| header.trim().eq_ignore_ascii_case(wanted))
        .map(|(_, value)| value)
}

/// Fold a record into the set, summing counts for a tour already present
fn merge_record(records: &mut RecordSet, record: TourRecord) {
    match records.get_mut(&record.tour_name) {
        Some(existing) => {
            existing.adult_count = existing.adult_count.saturating_add(record.adult_count);
            existing.child_count = existing.child_count.saturating_add(record.child_count);
        }
        None => {
            records.insert(record.tour_name.clone(), record);
        }
    }
}
