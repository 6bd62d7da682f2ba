//! Mutation context threaded through the clear → clone → bind → finalize steps

use crate::config::ReportLayout;
use crate::types::{SectionPlacement, TemplateBlock};
use crate::workbook::{Cell, MergeRange, Worksheet};
use std::collections::BTreeMap;

/// Pristine copy of the template block taken before anything is bound.
///
/// The first record binds the block in place, so later sections must be
/// cloned from this copy rather than from the (already bound) sheet rows.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSnapshot {
    block: TemplateBlock,
    /// (row offset within block, column) → cell
    cells: BTreeMap<(u32, u32), Cell>,
    /// row offset within block → height
    row_heights: BTreeMap<u32, f64>,
    /// Merges fully inside the block, at template coordinates
    merges: Vec<MergeRange>,
}

impl BlockSnapshot {
    pub fn capture(sheet: &Worksheet, block: TemplateBlock) -> Self {
        let (first_col, last_col) = block.column_span();
        let mut cells = BTreeMap::new();
        let mut row_heights = BTreeMap::new();

        for row in block.start_row..=block.end_row {
            let offset = row - block.start_row;
            for (col, cell) in sheet.row_cells(row, first_col, last_col) {
                cells.insert((offset, col), cell.clone());
            }
            if let Some(height) = sheet.row_height(row) {
                row_heights.insert(offset, height);
            }
        }

        let merges = sheet
            .merges()
            .iter()
            .filter(|m| m.within((block.start_row, block.end_row), (first_col, last_col)))
            .copied()
            .collect();

        Self {
            block,
            cells,
            row_heights,
            merges,
        }
    }

    pub fn block(&self) -> &TemplateBlock {
        &self.block
    }

    pub fn cell(&self, offset: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(offset, col))
    }

    pub fn row_height(&self, offset: u32) -> Option<f64> {
        self.row_heights.get(&offset).copied()
    }

    pub fn merges(&self) -> &[MergeRange] {
        &self.merges
    }
}

/// Everything one run mutates, owned or borrowed for the run's duration.
///
/// Each step takes `&mut ReportContext`, so the steps can be exercised in
/// isolation against a hand-built sheet.
pub struct ReportContext<'a> {
    sheet: &'a mut Worksheet,
    layout: &'a ReportLayout,
    block: TemplateBlock,
    snapshot: BlockSnapshot,
    placements: Vec<SectionPlacement>,
    style_anomalies: usize,
}

impl<'a> ReportContext<'a> {
    /// Start a run; the block is snapshotted immediately
    pub fn new(sheet: &'a mut Worksheet, layout: &'a ReportLayout, block: TemplateBlock) -> Self {
        let snapshot = BlockSnapshot::capture(sheet, block);
        Self {
            sheet,
            layout,
            block,
            snapshot,
            placements: Vec::new(),
            style_anomalies: 0,
        }
    }

    pub fn sheet(&self) -> &Worksheet {
        &*self.sheet
    }

    pub fn sheet_mut(&mut self) -> &mut Worksheet {
        &mut *self.sheet
    }

    pub fn layout(&self) -> &'a ReportLayout {
        self.layout
    }

    pub fn block(&self) -> TemplateBlock {
        self.block
    }

    pub fn snapshot(&self) -> &BlockSnapshot {
        &self.snapshot
    }

    /// Split borrow for clone steps that read the snapshot while writing the sheet
    pub fn snapshot_and_sheet(&mut self) -> (&BlockSnapshot, &mut Worksheet) {
        (&self.snapshot, &mut *self.sheet)
    }

    pub fn record_placement(&mut self, placement: SectionPlacement) {
        self.placements.push(placement);
    }

    pub fn placements(&self) -> &[SectionPlacement] {
        &self.placements
    }

    /// Note a cosmetic problem that was skipped rather than failing the run
    pub fn note_style_anomaly(&mut self) {
        self.style_anomalies += 1;
    }

    pub fn style_anomalies(&self) -> usize {
        self.style_anomalies
    }

    pub fn into_placements(self) -> Vec<SectionPlacement> {
        self.placements
    }
}
