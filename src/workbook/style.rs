//! Cell formatting as a plain value type.
//!
//! `CellStyle` owns every piece of its formatting, so `clone()` yields a
//! structurally independent copy. There is no shared style table behind it:
//! a style changed on one cell can never leak into another.

/// Font attributes. Colours are ARGB hex strings as stored in the file ("FF1F4E79").
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontStyle {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    /// OOXML underline kind ("single", "double", ...)
    pub underline: Option<String>,
    pub strikethrough: bool,
    pub color: Option<String>,
}

/// Pattern fill ("solid", "gray125", ...)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FillStyle {
    pub pattern: String,
    pub foreground: Option<String>,
    pub background: Option<String>,
}

/// One edge of a cell border
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BorderSide {
    /// OOXML border style ("thin", "medium", "dashed", ...)
    pub style: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Borders {
    pub left: Option<BorderSide>,
    pub right: Option<BorderSide>,
    pub top: Option<BorderSide>,
    pub bottom: Option<BorderSide>,
}

impl Borders {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none() && self.top.is_none() && self.bottom.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignmentStyle {
    /// "left", "center", "right", ...
    pub horizontal: Option<String>,
    /// "top", "center", "bottom", ...
    pub vertical: Option<String>,
    pub wrap_text: bool,
    pub rotation: Option<i16>,
}

/// Complete formatting bundle of one cell.
///
/// Fields are private; derive a changed style with the `with_*` methods,
/// which return a new value and leave the receiver untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellStyle {
    font: Option<FontStyle>,
    fill: Option<FillStyle>,
    borders: Borders,
    number_format: Option<String>,
    alignment: Option<AlignmentStyle>,
}

impl CellStyle {
    pub fn font(&self) -> Option<&FontStyle> {
        self.font.as_ref()
    }

    pub fn fill(&self) -> Option<&FillStyle> {
        self.fill.as_ref()
    }

    pub fn borders(&self) -> &Borders {
        &self.borders
    }

    pub fn number_format(&self) -> Option<&str> {
        self.number_format.as_deref()
    }

    pub fn alignment(&self) -> Option<&AlignmentStyle> {
        self.alignment.as_ref()
    }

    /// True when the style carries no formatting at all
    pub fn is_default(&self) -> bool {
        *self == CellStyle::default()
    }

    #[must_use]
    pub fn with_font(&self, font: FontStyle) -> Self {
        Self {
            font: Some(font),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_fill(&self, fill: FillStyle) -> Self {
        Self {
            fill: Some(fill),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_borders(&self, borders: Borders) -> Self {
        Self {
            borders,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_number_format(&self, code: impl Into<String>) -> Self {
        Self {
            number_format: Some(code.into()),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_alignment(&self, alignment: AlignmentStyle) -> Self {
        Self {
            alignment: Some(alignment),
            ..self.clone()
        }
    }

    /// Shortcut for the common case of toggling bold on the existing font
    #[must_use]
    pub fn with_bold(&self, bold: bool) -> Self {
        let mut font = self.font.clone().unwrap_or_default();
        font.bold = bold;
        self.with_font(font)
    }
}
