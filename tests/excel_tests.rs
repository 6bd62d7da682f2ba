//! Spreadsheet I/O tests: template round trips, dispatch import, full pipeline on disk

mod common;

use chrono::NaiveDate;
use common::{dispatch, template};
use eod_report::config::ReportLayout;
use eod_report::core::ReportGenerator;
use eod_report::excel::{DispatchImporter, ReportExporter, TemplateLoader};
use eod_report::types::TourRecord;
use eod_report::workbook::{CellValue, MergeRange};
use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook as XlsxWorkbook};
use std::path::Path;
use tempfile::TempDir;

fn write_template(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("template.xlsx");
    ReportExporter::new(&template()).export(&path).unwrap();
    path
}

fn write_dispatch_xlsx(path: &Path, rows: &[(&str, f64, f64)]) {
    let mut workbook = XlsxWorkbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Dispatch").unwrap();
    sheet.write_string(0, 0, "Tour Name").unwrap();
    sheet.write_string(0, 1, "No. of Adults").unwrap();
    sheet.write_string(0, 2, "No. of Children").unwrap();
    sheet.write_string(0, 3, "Guide").unwrap();
    for (i, (tour, adult, child)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, *tour).unwrap();
        sheet.write_number(row, 1, *adult).unwrap();
        sheet.write_number(row, 2, *child).unwrap();
        sheet.write_string(row, 3, "Sam").unwrap();
    }
    workbook.save(path).unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════
// TEMPLATE ROUND TRIP
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_template_round_trip_keeps_values_and_merges() {
    let dir = TempDir::new().unwrap();
    let path = write_template(dir.path());

    let loaded = TemplateLoader::load(&path).unwrap();

    let sheet = loaded.sheet("EOD").expect("sheet name kept");
    assert_eq!(
        sheet.value(17, 1),
        &CellValue::Text("{{tour_name}}".to_string())
    );
    assert_eq!(
        sheet.value(19, 1),
        &CellValue::Text("Total adults: {{num_adult}} est.".to_string())
    );
    assert!(sheet.merges().contains(&MergeRange::new(1, 1, 1, 8)));
    assert!(sheet.merges().contains(&MergeRange::new(17, 1, 17, 8)));
    assert_eq!(sheet.row_height(17), Some(22.0));
}

#[test]
fn test_template_round_trip_keeps_styles() {
    let dir = TempDir::new().unwrap();
    let path = write_template(dir.path());

    let loaded = TemplateLoader::load(&path).unwrap();
    let sheet = loaded.first_sheet().unwrap();

    let title = sheet.style(17, 1).expect("styled title cell");
    assert!(title.font().expect("font").bold);

    let border = sheet.style(25, 8).expect("blank bordered cell kept");
    let bottom = border.borders().bottom.as_ref().expect("bottom border");
    assert_eq!(bottom.style, "thin");

    assert_eq!(sheet.style(10, 3).unwrap().number_format(), Some("#,##0 \"pax\""));
}

#[test]
fn test_template_bytes_round_trip() {
    let bytes = ReportExporter::new(&template()).to_bytes().unwrap();

    let loaded = TemplateLoader::load_bytes(&bytes).unwrap();

    assert_eq!(loaded.sheet_count(), 1);
    assert_eq!(
        loaded.first_sheet().unwrap().value(18, 2),
        &CellValue::Text("{{num_adult}}".to_string())
    );
}

#[test]
fn test_loaded_template_locates() {
    let bytes = ReportExporter::new(&template()).to_bytes().unwrap();
    let loaded = TemplateLoader::load_bytes(&bytes).unwrap();

    let located = ReportGenerator::new(ReportLayout::default())
        .locate(&loaded)
        .unwrap();

    assert_eq!(located.sheet_name, "EOD");
    assert_eq!(located.placeholders.len(), 3);
}

/// Last six hex digits, so "FF4F81BD" and "4f81bd" compare equal
fn rgb(hex: &str) -> String {
    hex[hex.len().saturating_sub(6)..].to_ascii_uppercase()
}

#[test]
fn test_theme_colours_survive_load_clone_and_export() {
    let dir = TempDir::new().unwrap();
    let template_path = dir.path().join("themed.xlsx");
    let header = Format::new()
        .set_bold()
        .set_font_color(Color::Theme(5, 0))
        .set_background_color(Color::Theme(4, 0))
        .set_pattern(FormatPattern::Solid);
    let mut xlsx = XlsxWorkbook::new();
    let sheet = xlsx.add_worksheet();
    sheet.set_name("EOD").unwrap();
    sheet.write_string_with_format(16, 0, "{{tour_name}}", &header).unwrap();
    sheet.write_string(17, 1, "{{num_adult}}").unwrap();
    sheet.write_string(17, 3, "{{num_chd}}").unwrap();
    xlsx.save(&template_path).unwrap();

    let mut workbook = TemplateLoader::load(&template_path).unwrap();
    let loaded = workbook.first_sheet().unwrap().style(17, 1).unwrap().clone();
    let fill = loaded.fill().expect("fill kept").foreground.clone().expect("theme fill resolved");
    let font = loaded.font().unwrap().color.clone().expect("theme font colour resolved");
    assert_eq!(rgb(&fill).len(), 6);

    ReportGenerator::new(ReportLayout::default())
        .generate(
            &dispatch(&[("City Tour", 1.0, 0.0), ("Harbour Walk", 2.0, 0.0)]),
            &mut workbook,
        )
        .unwrap();
    let output = dir.path().join("eod.xlsx");
    ReportExporter::new(&workbook).export(&output).unwrap();

    let report = TemplateLoader::load(&output).unwrap();
    let cloned = report.first_sheet().unwrap().style(26, 1).unwrap();
    assert_eq!(rgb(cloned.fill().unwrap().foreground.as_deref().unwrap()), rgb(&fill));
    assert_eq!(rgb(cloned.font().unwrap().color.as_deref().unwrap()), rgb(&font));
}

// ═══════════════════════════════════════════════════════════════════════════
// DISPATCH IMPORT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_import_dispatch_xlsx() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dispatch.xlsx");
    write_dispatch_xlsx(
        &path,
        &[("City Tour", 10.0, 2.0), ("City Tour", 5.0, 0.0), ("Beach Trip", 0.0, 0.0)],
    );

    let data = DispatchImporter::new(&path).import().unwrap();
    assert_eq!(data.sheets.len(), 1);
    assert_eq!(data.row_count(), 3);

    let records = ReportGenerator::new(ReportLayout::default())
        .extract(&data)
        .unwrap();
    let records: Vec<TourRecord> = records.into_values().collect();
    assert_eq!(records, vec![TourRecord::new("City Tour", 15, 2)]);
}

#[test]
fn test_import_dispatch_bytes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dispatch.xlsx");
    write_dispatch_xlsx(&path, &[("Harbour Walk", 3.0, 1.0)]);
    let bytes = std::fs::read(&path).unwrap();

    let data = DispatchImporter::from_xlsx_bytes(bytes).unwrap();

    assert_eq!(data.sheets[0].name, "Dispatch");
    assert_eq!(data.sheets[0].rows[0].len(), 4);
}

#[test]
fn test_import_dispatch_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dispatch.json");
    std::fs::write(
        &path,
        r#"{"sheets":[{"name":"Sheet1","rows":[
            {"Tour":"City Tour","Adult":"3","Child":null},
            {"Tour":"City Tour","Adult":2,"Child":1}
        ]}]}"#,
    )
    .unwrap();

    let data = DispatchImporter::new(&path).import().unwrap();
    let records = ReportGenerator::new(ReportLayout::default())
        .extract(&data)
        .unwrap();

    assert_eq!(records["City Tour"], TourRecord::new("City Tour", 5, 1));
}

// ═══════════════════════════════════════════════════════════════════════════
// FULL PIPELINE ON DISK
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_generate_report_file() {
    let dir = TempDir::new().unwrap();
    let template_path = write_template(dir.path());
    let output = dir.path().join("eod.xlsx");

    let mut workbook = TemplateLoader::load(&template_path).unwrap();
    let generator = ReportGenerator::new(ReportLayout::default())
        .with_report_date(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
    let summary = generator
        .generate(
            &dispatch(&[("City Tour", 10.0, 2.0), ("Harbour Walk", 4.0, 1.0)]),
            &mut workbook,
        )
        .unwrap();
    ReportExporter::new(&workbook).export(&output).unwrap();

    assert_eq!(summary.sections.len(), 2);

    let report = TemplateLoader::load(&output).unwrap();
    let sheet = report.first_sheet().unwrap();
    assert_eq!(sheet.value(17, 1), &CellValue::Text("City Tour".to_string()));
    assert_eq!(sheet.value(26, 1), &CellValue::Text("Harbour Walk".to_string()));
    assert_eq!(sheet.value(27, 2), &CellValue::Number(4.0));
    assert_eq!(sheet.value(10, 3), &CellValue::Number(14.0));
    assert_eq!(sheet.value(10, 5), &CellValue::Number(3.0));
    assert!(sheet.merges().contains(&MergeRange::new(26, 1, 26, 8)));
    assert_eq!(sheet.row_height(26), Some(22.0));
    assert!(sheet.style(26, 1).unwrap().font().unwrap().bold);
}
