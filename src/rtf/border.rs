//! Paragraph and table-cell borders.

use super::types::ColorRef;

/// Border line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    /// No border
    #[default]
    None,
    /// Single line border
    Single,
    /// Double-thickness line
    Thick,
    /// Dotted border
    Dotted,
    /// Dashed border
    Dashed,
    /// Double line border
    Double,
    /// Triple line border
    Triple,
    /// Wavy border
    Wavy,
    /// Embossed border
    Embossed,
    /// Engraved border
    Engraved,
    /// Outset border (3D)
    Outset,
    /// Inset border (3D)
    Inset,
}

/// Border definition for one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    pub style: BorderStyle,
    /// Border width (in twips)
    pub width: i64,
    /// Border color
    pub color_ref: Option<ColorRef>,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            style: BorderStyle::default(),
            width: 15, // 1pt
            color_ref: None,
        }
    }
}

impl Border {
    #[inline]
    pub fn new(style: BorderStyle) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    #[inline]
    pub fn with_width(mut self, width: i64) -> Self {
        self.width = width;
        self
    }

    #[inline]
    pub fn with_color(mut self, color_ref: ColorRef) -> Self {
        self.color_ref = Some(color_ref);
        self
    }

    /// Check if border is visible
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.style != BorderStyle::None && self.width > 0
    }

    /// Width contributed to a `BorderThickness` value, zero when hidden.
    #[inline]
    pub fn effective_width(&self) -> i64 {
        if self.is_visible() { self.width } else { 0 }
    }
}

/// Borders for a paragraph or table cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Borders {
    pub top: Border,
    pub bottom: Border,
    pub left: Border,
    pub right: Border,
}

impl Borders {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set all borders to the same style
    #[inline]
    pub fn all(border: Border) -> Self {
        Self {
            top: border,
            bottom: border,
            left: border,
            right: border,
        }
    }

    /// Check if any border is visible
    #[inline]
    pub fn has_any_border(&self) -> bool {
        self.top.is_visible()
            || self.bottom.is_visible()
            || self.left.is_visible()
            || self.right.is_visible()
    }

    /// Edges in `BorderThickness` order: left, top, right, bottom.
    #[inline]
    pub fn ltrb(&self) -> [&Border; 4] {
        [&self.left, &self.top, &self.right, &self.bottom]
    }

    /// Color of the first visible edge, in `ltrb` order.
    pub fn brush_color(&self) -> Option<ColorRef> {
        self.ltrb()
            .into_iter()
            .find(|b| b.is_visible())
            .and_then(|b| b.color_ref)
    }
}
