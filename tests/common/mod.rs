//! Shared fixtures: a report template in the default layout and dispatch data

#![allow(dead_code)]

use eod_report::types::{DispatchData, DispatchSheet, FieldValue};
use eod_report::workbook::{
    BorderSide, Borders, Cell, CellStyle, CellValue, MergeRange, Workbook, Worksheet,
};

pub fn bold() -> CellStyle {
    CellStyle::default().with_bold(true)
}

pub fn bottom_border() -> CellStyle {
    CellStyle::default().with_borders(Borders {
        bottom: Some(BorderSide {
            style: "thin".to_string(),
            color: Some("FF000000".to_string()),
        }),
        ..Borders::default()
    })
}

/// Template in the default layout: block A17:H25, totals in C10/E10
pub fn template_sheet() -> Worksheet {
    let mut sheet = Worksheet::new("EOD");

    sheet.set_cell(1, 1, Cell::new("END OF DAY REPORT", bold()));
    sheet.add_merge(MergeRange::new(1, 1, 1, 8)).unwrap();
    sheet.set_value(10, 2, "Total adults:");
    sheet.set_cell(10, 3, Cell::new(CellValue::Empty, CellStyle::default().with_number_format("#,##0 \"pax\"")));
    sheet.set_value(10, 4, "Total children:");
    sheet.set_cell(10, 5, Cell::new(CellValue::Empty, CellStyle::default().with_number_format("#,##0 \"pax\"")));

    // Section block
    sheet.set_cell(17, 1, Cell::new("{{tour_name}}", bold()));
    sheet.add_merge(MergeRange::new(17, 1, 17, 8)).unwrap();
    sheet.set_row_height(17, Some(22.0));
    sheet.set_value(18, 1, "Adults");
    sheet.set_value(18, 2, "{{num_adult}}");
    sheet.set_value(18, 3, "Children");
    sheet.set_value(18, 4, "{{num_chd}}");
    sheet.set_value(19, 1, "Total adults: {{num_adult}} est.");
    sheet.set_cell(25, 8, Cell::new(CellValue::Empty, bottom_border()));

    sheet.set_column_width(1, 24.0);
    sheet
}

pub fn template() -> Workbook {
    let mut workbook = Workbook::new();
    workbook.add_sheet(template_sheet());
    workbook
}

/// One dispatch sheet with `Tour` / `Adult` / `Child` columns
pub fn dispatch(rows: &[(&str, f64, f64)]) -> DispatchData {
    let mut sheet = DispatchSheet::new("Dispatch");
    for (tour, adult, child) in rows {
        sheet.push_row([
            ("Tour", FieldValue::from(*tour)),
            ("Adult", FieldValue::from(*adult)),
            ("Child", FieldValue::from(*child)),
        ]);
    }
    let mut data = DispatchData::new();
    data.add_sheet(sheet);
    data
}
