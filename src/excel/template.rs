//! Template loader - styled .xlsx template → in-memory Workbook

use crate::error::{EodError, EodResult};
use crate::workbook::{
    AlignmentStyle, BorderSide, Borders, Cell, CellStyle, CellValue, FillStyle, FontStyle,
    MergeRange, Workbook, Worksheet,
};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};
use umya_spreadsheet::structs::drawing::Theme;
use umya_spreadsheet::structs::{
    Color, EnumTrait, HorizontalAlignmentValues, VerticalAlignmentValues,
};

/// Loads report templates with their formatting, merges and dimensions
pub struct TemplateLoader;

impl TemplateLoader {
    /// Load a template from disk
    pub fn load(path: &Path) -> EodResult<Workbook> {
        let book = umya_spreadsheet::reader::xlsx::read(path).map_err(|e| {
            EodError::InputShape(format!("unreadable template {}: {}", path.display(), e))
        })?;
        Ok(convert_book(&book))
    }

    /// Load a template from stored bytes
    pub fn load_bytes(bytes: &[u8]) -> EodResult<Workbook> {
        let book = umya_spreadsheet::reader::xlsx::read_reader(Cursor::new(bytes.to_vec()), true)
            .map_err(|e| EodError::InputShape(format!("unreadable template: {}", e)))?;
        Ok(convert_book(&book))
    }
}

fn convert_book(book: &umya_spreadsheet::Spreadsheet) -> Workbook {
    let styles = StyleReader::new(book.get_theme());
    let mut workbook = Workbook::new();
    for sheet in book.get_sheet_collection() {
        workbook.add_sheet(convert_sheet(sheet, &styles));
    }

    let names = book.get_defined_names();
    if !names.is_empty() {
        warn!(
            count = names.len(),
            "template defined names (print areas, print titles) are not carried into the report"
        );
    }
    workbook
}

fn convert_sheet(source: &umya_spreadsheet::Worksheet, styles: &StyleReader) -> Worksheet {
    let mut sheet = Worksheet::new(source.get_name());

    let dropped = unmodeled_features(source);
    if !dropped.is_empty() {
        warn!(
            sheet = source.get_name(),
            features = %dropped.join(", "),
            "template features are not carried into the report"
        );
    }

    for cell in source.get_cell_collection() {
        let coord = cell.get_coordinate();
        let row = *coord.get_row_num();
        let col = *coord.get_col_num();
        sheet.set_cell(
            row,
            col,
            Cell {
                value: convert_value(cell),
                style: styles.convert(cell.get_style(), &coord.get_coordinate()),
            },
        );
    }

    for range in source.get_merge_cells() {
        let text = range.get_range();
        match text.parse::<MergeRange>() {
            Ok(merge) => {
                if let Err(e) = sheet.add_merge(merge) {
                    warn!(sheet = source.get_name(), merge = %text, error = %e, "skipping merge");
                }
            }
            Err(e) => {
                warn!(sheet = source.get_name(), merge = %text, error = %e, "unreadable merge range");
            }
        }
    }

    for row in source.get_row_dimensions() {
        let height = *row.get_height();
        if height > 0.0 {
            sheet.set_row_height(*row.get_row_num(), Some(height));
        }
    }

    for column in source.get_column_dimensions() {
        let width = *column.get_width();
        if width > 0.0 {
            sheet.set_column_width(*column.get_col_num(), width);
        }
    }

    debug!(
        sheet = sheet.name(),
        max_row = sheet.max_row(),
        merges = sheet.merges().len(),
        "loaded template sheet"
    );
    sheet
}

fn convert_value(cell: &umya_spreadsheet::Cell) -> CellValue {
    if cell.is_formula() {
        return CellValue::Formula(cell.get_formula().to_string());
    }

    let raw = cell.get_value();
    if raw.is_empty() {
        return CellValue::Empty;
    }

    match cell.get_data_type() {
        "b" => CellValue::Bool(raw == "1" || raw.eq_ignore_ascii_case("true")),
        "s" | "str" | "inlineStr" | "e" => CellValue::Text(raw.to_string()),
        _ => match raw.parse::<f64>() {
            Ok(number) => CellValue::Number(number),
            Err(_) => CellValue::Text(raw.to_string()),
        },
    }
}

/// Worksheet content the workbook model has no room for
fn unmodeled_features(source: &umya_spreadsheet::Worksheet) -> Vec<&'static str> {
    let mut found = Vec::new();
    if !source.get_image_collection().is_empty() {
        found.push("images");
    }
    if !source.get_chart_collection().is_empty() {
        found.push("charts");
    }
    if !source.get_conditional_formatting_collection().is_empty() {
        found.push("conditional formatting");
    }
    if source.get_data_validations().is_some() {
        found.push("data validation");
    }
    if !source.get_comments().is_empty() {
        found.push("comments");
    }
    if source
        .get_sheets_views()
        .get_sheet_view_list()
        .iter()
        .any(|view| view.get_pane().is_some())
    {
        found.push("freeze panes");
    }
    if source.get_row_dimensions().iter().any(|row| *row.get_hidden()) {
        found.push("hidden rows");
    }
    if source.get_column_dimensions().iter().any(|col| *col.get_hidden()) {
        found.push("hidden columns");
    }
    found
}

/// Converts umya styles, resolving theme colours against the workbook theme
struct StyleReader<'a> {
    theme: &'a Theme,
}

impl<'a> StyleReader<'a> {
    fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    /// Copy every formatting attribute we model out of umya's style
    fn convert(&self, style: &umya_spreadsheet::Style, at: &str) -> CellStyle {
        let mut result = CellStyle::default();

        if let Some(font) = style.get_font() {
            let underline = font.get_underline();
            result = result.with_font(FontStyle {
                name: non_empty(font.get_name()),
                size: Some(*font.get_size()).filter(|s| *s > 0.0),
                bold: *font.get_bold(),
                italic: *font.get_italic(),
                underline: if underline.is_empty() || underline.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(underline.to_string())
                },
                strikethrough: *font.get_strikethrough(),
                color: self.color(font.get_color(), at, "font"),
            });
        }

        if let Some(pattern) = style.get_fill().and_then(|fill| fill.get_pattern_fill()) {
            let kind = pattern.get_pattern_type().get_value_string();
            if !kind.eq_ignore_ascii_case("none") {
                result = result.with_fill(FillStyle {
                    pattern: kind.to_string(),
                    foreground: pattern
                        .get_foreground_color()
                        .and_then(|c| self.color(c, at, "fill foreground")),
                    background: pattern
                        .get_background_color()
                        .and_then(|c| self.color(c, at, "fill background")),
                });
            }
        }

        if let Some(borders) = style.get_borders() {
            let converted = Borders {
                left: self.border(borders.get_left_border(), at),
                right: self.border(borders.get_right_border(), at),
                top: self.border(borders.get_top_border(), at),
                bottom: self.border(borders.get_bottom_border(), at),
            };
            if !converted.is_empty() {
                result = result.with_borders(converted);
            }
        }

        if let Some(format) = style.get_number_format() {
            let code = format.get_format_code();
            if !code.is_empty() && !code.eq_ignore_ascii_case("general") {
                result = result.with_number_format(code);
            }
        }

        if let Some(alignment) = style.get_alignment() {
            let horizontal = (alignment.get_horizontal() != &HorizontalAlignmentValues::General)
                .then(|| alignment.get_horizontal().get_value_string().to_string());
            let vertical = (alignment.get_vertical() != &VerticalAlignmentValues::Bottom)
                .then(|| alignment.get_vertical().get_value_string().to_string());
            let rotation = i16::try_from(*alignment.get_text_rotation())
                .ok()
                .filter(|r| *r != 0);
            let wrap_text = *alignment.get_wrap_text();

            if horizontal.is_some() || vertical.is_some() || rotation.is_some() || wrap_text {
                result = result.with_alignment(AlignmentStyle {
                    horizontal,
                    vertical,
                    wrap_text,
                    rotation,
                });
            }
        }

        result
    }

    fn border(&self, border: &umya_spreadsheet::Border, at: &str) -> Option<BorderSide> {
        let style = border.get_border_style();
        if style.is_empty() || style.eq_ignore_ascii_case("none") {
            return None;
        }
        Some(BorderSide {
            style: style.to_string(),
            color: self.color(border.get_color(), at, "border"),
        })
    }

    /// Explicit RGB, palette index, or theme slot with tint, as hex
    fn color(&self, color: &Color, at: &str, part: &str) -> Option<String> {
        if *color == Color::default() {
            return None;
        }
        if let Some(argb) = non_empty(color.get_argb()) {
            return Some(argb);
        }
        // 64 and 65 are the system "automatic" colours
        if *color.get_indexed() >= 64 {
            return None;
        }

        let index = *color.get_theme_index();
        let slot = self
            .theme
            .get_theme_elements()
            .get_color_scheme()
            .get_color_map()
            .into_iter()
            .nth(index as usize);
        // umya's tint math panics on anything but six hex digits
        if slot.as_deref().is_some_and(is_hex_rgb) {
            if let Some(resolved) = non_empty(&color.get_argb_with_theme(self.theme)) {
                return Some(resolved);
            }
        }

        warn!(
            cell = at,
            part,
            theme_index = index,
            "colour could not be resolved; dropped"
        );
        None
    }
}

fn is_hex_rgb(s: &str) -> bool {
    s.len() == 6 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

fn non_empty(s: &str) -> Option<String> {
    Some(s.to_string()).filter(|s| !s.is_empty())
}
