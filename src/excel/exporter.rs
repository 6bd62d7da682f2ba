//! Report exporter - in-memory Workbook → .xlsx with formatting preserved

use crate::error::{EodError, EodResult};
use crate::workbook::{
    column_letter, AlignmentStyle, BorderSide, CellStyle, CellValue, FillStyle, FontStyle,
    Workbook, Worksheet,
};
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, FormatPattern, FormatUnderline, Formula,
    Workbook as XlsxWorkbook, Worksheet as XlsxWorksheet,
};
use std::path::Path;
use tracing::{debug, warn};

/// Writes a filled report workbook back to disk
pub struct ReportExporter<'a> {
    workbook: &'a Workbook,
}

impl<'a> ReportExporter<'a> {
    /// Create a new report exporter
    pub fn new(workbook: &'a Workbook) -> Self {
        Self { workbook }
    }

    /// Export to an .xlsx file. Returns the number of formatting attributes
    /// that could not be carried over (each one is logged).
    pub fn export(&self, output_path: &Path) -> EodResult<usize> {
        let (mut xlsx, anomalies) = self.build()?;
        xlsx.save(output_path).map_err(|e| {
            EodError::Export(format!(
                "Failed to save report {}: {}",
                output_path.display(),
                e
            ))
        })?;
        Ok(anomalies)
    }

    /// Export to an in-memory .xlsx
    pub fn to_bytes(&self) -> EodResult<Vec<u8>> {
        let (mut xlsx, _) = self.build()?;
        xlsx.save_to_buffer()
            .map_err(|e| EodError::Export(format!("Failed to serialise report: {}", e)))
    }

    fn build(&self) -> EodResult<(XlsxWorkbook, usize)> {
        let mut xlsx = XlsxWorkbook::new();
        let mut anomalies = 0;

        for sheet in self.workbook.sheets() {
            let worksheet = xlsx.add_worksheet();
            worksheet.set_name(sheet.name()).map_err(|e| {
                EodError::Export(format!("Failed to set worksheet name: {}", e))
            })?;
            anomalies += export_sheet(worksheet, sheet)?;
        }

        if anomalies > 0 {
            warn!(anomalies, "report exported with unsupported formatting");
        }
        Ok((xlsx, anomalies))
    }
}

/// Write one sheet: dimensions, then merges, then cells (so merged anchors
/// end up holding their real values)
fn export_sheet(worksheet: &mut XlsxWorksheet, sheet: &Worksheet) -> EodResult<usize> {
    let mut anomalies = 0;

    for (col, width) in sheet.column_widths() {
        worksheet
            .set_column_width(col_index(col)?, width)
            .map_err(|e| EodError::Export(format!("Failed to set column width: {}", e)))?;
    }

    for (row, height) in sheet.row_heights() {
        worksheet
            .set_row_height(row - 1, height)
            .map_err(|e| EodError::Export(format!("Failed to set row height: {}", e)))?;
    }

    for merge in sheet.merges() {
        if merge.first_row == merge.last_row && merge.first_col == merge.last_col {
            continue; // Single cell, nothing to merge
        }
        let (row, col) = merge.anchor();
        let format = match sheet.style(row, col) {
            Some(style) => format_from_style(style, &cell_name(row, col), &mut anomalies),
            None => Format::new(),
        };
        worksheet
            .merge_range(
                merge.first_row - 1,
                col_index(merge.first_col)?,
                merge.last_row - 1,
                col_index(merge.last_col)?,
                "",
                &format,
            )
            .map_err(|e| EodError::Export(format!("Failed to merge {}: {}", merge, e)))?;
    }

    let mut written = 0usize;
    for ((row, col), cell) in sheet.cells() {
        if cell.is_blank() {
            continue;
        }
        let format = format_from_style(&cell.style, &cell_name(row, col), &mut anomalies);
        let (r, c) = (row - 1, col_index(col)?);

        let result = match &cell.value {
            CellValue::Empty => worksheet.write_blank(r, c, &format),
            CellValue::Text(text) => worksheet.write_string_with_format(r, c, text, &format),
            CellValue::Number(number) => worksheet.write_number_with_format(r, c, *number, &format),
            CellValue::Bool(flag) => worksheet.write_boolean_with_format(r, c, *flag, &format),
            CellValue::Formula(formula) => {
                worksheet.write_formula_with_format(r, c, Formula::new(formula), &format)
            }
        };
        result.map_err(|e| {
            EodError::Export(format!("Failed to write {}: {}", cell_name(row, col), e))
        })?;
        written += 1;
    }

    debug!(
        sheet = sheet.name(),
        cells = written,
        merges = sheet.merges().len(),
        "exported sheet"
    );
    Ok(anomalies)
}

fn col_index(col: u32) -> EodResult<u16> {
    u16::try_from(col.saturating_sub(1))
        .map_err(|_| EodError::Export(format!("column {} is out of range", col)))
}

fn cell_name(row: u32, col: u32) -> String {
    format!("{}{}", column_letter(col), row)
}

/// Translate a cell style into an xlsx format.
///
/// Attributes with no xlsx equivalent are skipped with a warning and counted
/// in `anomalies`; they never fail the export.
pub fn format_from_style(style: &CellStyle, at: &str, anomalies: &mut usize) -> Format {
    let mut format = Format::new();
    let mut issue = |what: &str, value: &str| {
        warn!(cell = at, attribute = what, value, "unsupported formatting skipped");
        *anomalies += 1;
    };

    if let Some(font) = style.font() {
        format = apply_font(format, font, &mut issue);
    }
    if let Some(fill) = style.fill() {
        format = apply_fill(format, fill, &mut issue);
    }

    let borders = style.borders();
    for (side, border) in [
        (Side::Left, &borders.left),
        (Side::Right, &borders.right),
        (Side::Top, &borders.top),
        (Side::Bottom, &borders.bottom),
    ] {
        if let Some(border) = border {
            format = apply_border(format, side, border, &mut issue);
        }
    }

    if let Some(code) = style.number_format() {
        format = format.set_num_format(code);
    }
    if let Some(alignment) = style.alignment() {
        format = apply_alignment(format, alignment, &mut issue);
    }

    format
}

fn apply_font(mut format: Format, font: &FontStyle, issue: &mut impl FnMut(&str, &str)) -> Format {
    if let Some(name) = &font.name {
        format = format.set_font_name(name);
    }
    if let Some(size) = font.size {
        format = format.set_font_size(size);
    }
    if font.bold {
        format = format.set_bold();
    }
    if font.italic {
        format = format.set_italic();
    }
    if font.strikethrough {
        format = format.set_font_strikethrough();
    }
    if let Some(underline) = &font.underline {
        match underline_kind(underline) {
            Some(kind) => format = format.set_underline(kind),
            None => issue("underline", underline),
        }
    }
    if let Some(color) = &font.color {
        match parse_color(color) {
            Some(color) => format = format.set_font_color(color),
            None => issue("font color", color),
        }
    }
    format
}

fn apply_fill(mut format: Format, fill: &FillStyle, issue: &mut impl FnMut(&str, &str)) -> Format {
    let Some(pattern) = pattern_kind(&fill.pattern) else {
        issue("fill pattern", &fill.pattern);
        return format;
    };
    format = format.set_pattern(pattern);

    let foreground = fill.foreground.as_deref().and_then(|c| {
        let parsed = parse_color(c);
        if parsed.is_none() {
            issue("fill color", c);
        }
        parsed
    });
    let background = fill.background.as_deref().and_then(|c| {
        let parsed = parse_color(c);
        if parsed.is_none() {
            issue("fill color", c);
        }
        parsed
    });

    if pattern == FormatPattern::Solid {
        // A solid fill shows the pattern colour as the cell colour
        if let Some(color) = foreground.or(background) {
            format = format.set_background_color(color);
        }
    } else {
        if let Some(color) = foreground {
            format = format.set_foreground_color(color);
        }
        if let Some(color) = background {
            format = format.set_background_color(color);
        }
    }
    format
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

fn apply_border(
    mut format: Format,
    side: Side,
    border: &BorderSide,
    issue: &mut impl FnMut(&str, &str),
) -> Format {
    let Some(kind) = border_kind(&border.style) else {
        issue("border style", &border.style);
        return format;
    };
    format = match side {
        Side::Left => format.set_border_left(kind),
        Side::Right => format.set_border_right(kind),
        Side::Top => format.set_border_top(kind),
        Side::Bottom => format.set_border_bottom(kind),
    };

    if let Some(color) = &border.color {
        match parse_color(color) {
            Some(color) => {
                format = match side {
                    Side::Left => format.set_border_left_color(color),
                    Side::Right => format.set_border_right_color(color),
                    Side::Top => format.set_border_top_color(color),
                    Side::Bottom => format.set_border_bottom_color(color),
                };
            }
            None => issue("border color", color),
        }
    }
    format
}

fn apply_alignment(
    mut format: Format,
    alignment: &AlignmentStyle,
    issue: &mut impl FnMut(&str, &str),
) -> Format {
    if let Some(horizontal) = &alignment.horizontal {
        match horizontal_kind(horizontal) {
            Some(kind) => format = format.set_align(kind),
            None => issue("horizontal alignment", horizontal),
        }
    }
    if let Some(vertical) = &alignment.vertical {
        match vertical_kind(vertical) {
            Some(kind) => format = format.set_align(kind),
            None => issue("vertical alignment", vertical),
        }
    }
    if alignment.wrap_text {
        format = format.set_text_wrap();
    }
    if let Some(rotation) = alignment.rotation {
        match xlsx_rotation(rotation) {
            Some(angle) => format = format.set_rotation(angle),
            None => issue("text rotation", &rotation.to_string()),
        }
    }
    format
}

/// `FF1F4E79` / `1F4E79` / `#1F4E79` → RGB; the alpha byte is dropped
fn parse_color(argb: &str) -> Option<Color> {
    let hex = argb.trim().trim_start_matches('#');
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let rgb = match hex.len() {
        8 => hex.get(2..)?,
        6 => hex,
        _ => return None,
    };
    u32::from_str_radix(rgb, 16).ok().map(Color::RGB)
}

fn underline_kind(name: &str) -> Option<FormatUnderline> {
    match name {
        "single" => Some(FormatUnderline::Single),
        "double" => Some(FormatUnderline::Double),
        "singleAccounting" => Some(FormatUnderline::SingleAccounting),
        "doubleAccounting" => Some(FormatUnderline::DoubleAccounting),
        _ => None,
    }
}

fn pattern_kind(name: &str) -> Option<FormatPattern> {
    let pattern = match name {
        "solid" => FormatPattern::Solid,
        "mediumGray" => FormatPattern::MediumGray,
        "darkGray" => FormatPattern::DarkGray,
        "lightGray" => FormatPattern::LightGray,
        "darkHorizontal" => FormatPattern::DarkHorizontal,
        "darkVertical" => FormatPattern::DarkVertical,
        "darkDown" => FormatPattern::DarkDown,
        "darkUp" => FormatPattern::DarkUp,
        "darkGrid" => FormatPattern::DarkGrid,
        "darkTrellis" => FormatPattern::DarkTrellis,
        "lightHorizontal" => FormatPattern::LightHorizontal,
        "lightVertical" => FormatPattern::LightVertical,
        "lightDown" => FormatPattern::LightDown,
        "lightUp" => FormatPattern::LightUp,
        "lightGrid" => FormatPattern::LightGrid,
        "lightTrellis" => FormatPattern::LightTrellis,
        "gray125" => FormatPattern::Gray125,
        "gray0625" => FormatPattern::Gray0625,
        _ => return None,
    };
    Some(pattern)
}

fn border_kind(name: &str) -> Option<FormatBorder> {
    let border = match name {
        "thin" => FormatBorder::Thin,
        "medium" => FormatBorder::Medium,
        "dashed" => FormatBorder::Dashed,
        "dotted" => FormatBorder::Dotted,
        "thick" => FormatBorder::Thick,
        "double" => FormatBorder::Double,
        "hair" => FormatBorder::Hair,
        "mediumDashed" => FormatBorder::MediumDashed,
        "dashDot" => FormatBorder::DashDot,
        "mediumDashDot" => FormatBorder::MediumDashDot,
        "dashDotDot" => FormatBorder::DashDotDot,
        "mediumDashDotDot" => FormatBorder::MediumDashDotDot,
        "slantDashDot" => FormatBorder::SlantDashDot,
        _ => return None,
    };
    Some(border)
}

fn horizontal_kind(name: &str) -> Option<FormatAlign> {
    let align = match name {
        "general" => FormatAlign::General,
        "left" => FormatAlign::Left,
        "center" => FormatAlign::Center,
        "right" => FormatAlign::Right,
        "fill" => FormatAlign::Fill,
        "justify" => FormatAlign::Justify,
        "centerContinuous" => FormatAlign::CenterAcross,
        "distributed" => FormatAlign::Distributed,
        _ => return None,
    };
    Some(align)
}

fn vertical_kind(name: &str) -> Option<FormatAlign> {
    let align = match name {
        "top" => FormatAlign::Top,
        "center" => FormatAlign::VerticalCenter,
        "bottom" => FormatAlign::Bottom,
        "justify" => FormatAlign::VerticalJustify,
        "distributed" => FormatAlign::VerticalDistributed,
        _ => return None,
    };
    Some(align)
}

/// Stored rotations: 0..=90 counter-clockwise, 91..=180 clockwise (as
/// 90 + degrees), 255 for stacked text
fn xlsx_rotation(stored: i16) -> Option<i16> {
    match stored {
        -90..=90 => Some(stored),
        91..=180 => Some(90 - stored),
        255 | 270 => Some(270),
        _ => None,
    }
}
