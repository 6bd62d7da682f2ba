//! EOD Report - end-of-day tour reports from dispatch spreadsheets
//!
//! Extracts per-tour passenger counts from a dispatch workbook and writes
//! them into a formatted report template, repeating the template's section
//! block once per tour while keeping every style, merge and row height.
//!
//! # Features
//!
//! - Header aliases for dispatch columns, with case-insensitive fallback
//! - Aggregation by exact tour name in order of first occurrence
//! - Section cloning from a pristine snapshot of the template block
//! - Exact whole-cell placeholder binding
//! - Totals and an optional report date in fixed cells
//!
//! # Example
//!
//! ```no_run
//! use eod_report::config::ReportLayout;
//! use eod_report::core::ReportGenerator;
//! use eod_report::excel::{DispatchImporter, ReportExporter, TemplateLoader};
//! use std::path::Path;
//!
//! let data = DispatchImporter::new("dispatch.xlsx").import()?;
//! let mut workbook = TemplateLoader::load(Path::new("template.xlsx"))?;
//!
//! let generator = ReportGenerator::new(ReportLayout::default());
//! let summary = generator.generate(&data, &mut workbook)?;
//! println!("{} tours", summary.sections.len());
//!
//! ReportExporter::new(&workbook).export(Path::new("eod.xlsx"))?;
//! # Ok::<(), eod_report::error::EodError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod logging;
pub mod types;
pub mod workbook;

// Re-export commonly used types
pub use config::ReportLayout;
pub use core::ReportGenerator;
pub use error::{EodError, EodResult};
pub use types::{DispatchData, ReportSummary, TourRecord};
