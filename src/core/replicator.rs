//! Section replication and placeholder binding
//!
//! Sections are written top to bottom: the first record reuses the template
//! block in place, record `i` (i ≥ 1) gets a clone starting at
//! `end_row + 1 + (i - 1) * height`.

use super::context::ReportContext;
use crate::types::{PlaceholderKind, SectionPlacement, TourRecord};
use crate::workbook::CellValue;
use tracing::{debug, info, warn};

/// Blank all values below the block, up to the configured bound.
///
/// Runs before any section is placed so that a template saved from an
/// earlier, longer report carries no stale rows into this one. Cell styles
/// stay. Merges inside the cleared area and custom row heights are dropped;
/// each cloned section re-applies its own.
pub fn clear_overflow(ctx: &mut ReportContext) -> usize {
    let block = ctx.block();
    let end = ctx.layout().overflow_end();
    if end <= block.end_row {
        return 0;
    }

    let rows = (block.end_row + 1, end);
    let cols = block.column_span();
    let sheet = ctx.sheet_mut();
    let cleared = sheet.clear_values(rows, cols);
    let merges = sheet.remove_merges_within(rows, cols);
    let heights = sheet.clear_row_heights(rows);

    debug!(
        from_row = rows.0,
        to_row = rows.1,
        cleared,
        merges,
        heights,
        "cleared overflow region"
    );
    cleared
}

/// Copy the pristine block into the rows starting at `dest_start`.
///
/// Every column of the span is written, including blank cells, so a
/// border-only cell keeps its border and leftovers at the destination are
/// replaced. Row heights and block-internal merges follow the rows.
pub fn clone_section(ctx: &mut ReportContext, dest_start: u32) {
    let block = ctx.block();
    let (first_col, last_col) = block.column_span();
    let delta = dest_start - block.start_row;
    let mut skipped_merges = 0;

    {
        let (snapshot, sheet) = ctx.snapshot_and_sheet();

        for offset in 0..block.height() {
            let row = dest_start + offset;
            for col in first_col..=last_col {
                match snapshot.cell(offset, col) {
                    Some(source) => sheet.set_cell(row, col, source.clone()),
                    None => {
                        sheet.remove_cell(row, col);
                    }
                }
            }
            sheet.set_row_height(row, snapshot.row_height(offset));
        }

        for merge in snapshot.merges() {
            let moved = merge.offset_rows(delta);
            if let Err(e) = sheet.add_merge(moved) {
                warn!(merge = %moved, error = %e, "skipping merge in cloned section");
                skipped_merges += 1;
            }
        }
    }

    for _ in 0..skipped_merges {
        ctx.note_style_anomaly();
    }
}

/// Replace every exact placeholder in the section starting at `start` with
/// the record's fields. Returns how many cells were bound.
pub fn bind_section(ctx: &mut ReportContext, start: u32, record: &TourRecord) -> usize {
    let block = ctx.block();
    let (first_col, last_col) = block.column_span();
    let tokens = &ctx.layout().tokens;

    let mut hits = Vec::new();
    for row in start..start + block.height() {
        for (col, cell) in ctx.sheet().row_cells(row, first_col, last_col) {
            if let CellValue::Text(text) = &cell.value {
                if let Some(kind) = tokens.classify(text) {
                    hits.push((row, col, kind));
                }
            }
        }
    }

    let sheet = ctx.sheet_mut();
    for (row, col, kind) in &hits {
        let value = match kind {
            PlaceholderKind::TourName => CellValue::Text(record.tour_name.clone()),
            PlaceholderKind::AdultCount => CellValue::from(record.adult_count),
            PlaceholderKind::ChildCount => CellValue::from(record.child_count),
        };
        sheet.set_value(*row, *col, value);
    }

    hits.len()
}

/// Lays out one bound section per record, in record order
pub struct SectionReplicator;

impl SectionReplicator {
    pub fn place_sections<'r, I>(ctx: &mut ReportContext, records: I) -> usize
    where
        I: IntoIterator<Item = &'r TourRecord>,
    {
        let block = ctx.block();
        let mut placed = 0u32;

        for record in records {
            let start = block.section_start(placed);
            if placed > 0 {
                clone_section(ctx, start);
            }
            let bound = bind_section(ctx, start, record);
            debug!(
                tour = %record.tour_name,
                start_row = start,
                bound,
                "bound section"
            );

            ctx.record_placement(SectionPlacement {
                tour_name: record.tour_name.clone(),
                start_row: start,
                end_row: start + block.height() - 1,
            });
            placed += 1;
        }

        if placed == 0 {
            warn!(
                start_row = block.start_row,
                "no tour records; template block left unbound"
            );
        } else {
            info!(sections = placed, height = block.height(), "placed sections");
        }

        placed as usize
    }
}
