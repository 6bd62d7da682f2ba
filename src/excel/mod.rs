//! Spreadsheet I/O
//!
//! - Import: dispatch spreadsheet (calamine) or JSON → `DispatchData`
//! - Template: styled .xlsx (umya-spreadsheet) → `Workbook`
//! - Export: `Workbook` → .xlsx (rust_xlsxwriter)

mod exporter;
mod importer;
mod template;

pub use exporter::{format_from_style, ReportExporter};
pub use importer::DispatchImporter;
pub use template::TemplateLoader;
