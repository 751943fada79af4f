//! Character, paragraph and table-row formatting state.
//!
//! A [`FormatState`] is the flattened formatting record that every node of the
//! document tree carries. Color and font fields hold indices into the
//! converter's tables, `None` meaning "not set / inherit".

use super::border::Borders;
use super::list::MarkerStyle;
use super::types::{ColorRef, FontRef};
use smallvec::SmallVec;

/// Text or layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirState {
    /// No explicit direction; behaves as left-to-right.
    #[default]
    Default,
    /// Left-to-right
    Ltr,
    /// Right-to-left
    Rtl,
}

impl DirState {
    #[inline]
    pub fn is_rtl(self) -> bool {
        self == DirState::Rtl
    }

    /// `FlowDirection` attribute value.
    #[inline]
    pub fn flow_direction(self) -> &'static str {
        if self.is_rtl() {
            "RightToLeft"
        } else {
            "LeftToRight"
        }
    }
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Default,
    Left,
    Right,
    Center,
    Justify,
    Distribute,
}

impl HAlign {
    /// `TextAlignment` value for this alignment in a paragraph flowing in `dir`.
    ///
    /// RTF alignments are physical while `TextAlignment` is logical, so left and
    /// right swap inside right-to-left paragraphs.
    pub fn text_alignment(self, dir: DirState) -> Option<&'static str> {
        let rtl = dir.is_rtl();
        match self {
            HAlign::Default => None,
            HAlign::Left => Some(if rtl { "Right" } else { "Left" }),
            HAlign::Right => Some(if rtl { "Left" } else { "Right" }),
            HAlign::Center => Some("Center"),
            HAlign::Justify | HAlign::Distribute => Some("Justify"),
        }
    }
}

/// Underline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Underline {
    #[default]
    None,
    Normal,
    Words,
    Double,
    Dotted,
    Dash,
    Wave,
    Thick,
}

/// Strikethrough state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strike {
    #[default]
    None,
    Single,
    Double,
}

/// Participation of a cell in a merge along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellMerge {
    #[default]
    None,
    /// First cell of a merged range
    First,
    /// Cell absorbed into the preceding merge head
    Continue,
}

/// Per-cell formatting of a table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellFormat {
    /// Right boundary of the cell, in twips from the row origin
    pub cell_x: Option<i64>,
    /// Background color
    pub cb: Option<ColorRef>,
    /// Pattern (foreground) color
    pub cf: Option<ColorRef>,
    /// Shading in hundredths of a percent
    pub shading: Option<u16>,
    pub h_merge: CellMerge,
    pub v_merge: CellMerge,
    pub borders: Borders,
}

impl Default for CellFormat {
    fn default() -> Self {
        Self {
            cell_x: None,
            cb: None,
            cf: None,
            shading: None,
            h_merge: CellMerge::None,
            v_merge: CellMerge::None,
            borders: Borders::default(),
        }
    }
}

impl CellFormat {
    /// Cell format with only its right boundary set.
    #[inline]
    pub fn at(cell_x: i64) -> Self {
        Self {
            cell_x: Some(cell_x),
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_hmerge_first(&self) -> bool {
        self.h_merge == CellMerge::First
    }

    #[inline]
    pub fn is_hmerge(&self) -> bool {
        self.h_merge == CellMerge::Continue
    }

    #[inline]
    pub fn is_vmerge_first(&self) -> bool {
        self.v_merge == CellMerge::First
    }

    #[inline]
    pub fn is_vmerge(&self) -> bool {
        self.v_merge == CellMerge::Continue
    }
}

/// Table row definition (`\trowd` group).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowFormat {
    /// Cell definitions in left-to-right order
    pub cells: SmallVec<[CellFormat; 8]>,
    /// Left edge of the row (`\trleft`), in twips
    pub left: i64,
    /// Half the space between cells (`\trgaph`), in twips
    pub gap: i64,
    /// Row direction
    pub dir: DirState,
}

impl RowFormat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row whose cells end at the given boundaries.
    pub fn with_boundaries(boundaries: &[i64]) -> Self {
        Self {
            cells: boundaries.iter().map(|&x| CellFormat::at(x)).collect(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn nth_cell(&self, n: usize) -> Option<&CellFormat> {
        self.cells.get(n)
    }

    #[inline]
    pub fn nth_cell_mut(&mut self, n: usize) -> Option<&mut CellFormat> {
        self.cells.get_mut(n)
    }

    /// Left boundary of the `n`th cell: the previous set boundary, or the
    /// row's left edge.
    pub fn cell_left(&self, n: usize) -> i64 {
        self.cells[..n.min(self.cells.len())]
            .iter()
            .rev()
            .find_map(|cf| cf.cell_x)
            .unwrap_or(self.left)
    }

    /// Whether any cell participates in a vertical merge.
    pub fn is_vmerge(&self) -> bool {
        self.cells
            .iter()
            .any(|cf| cf.v_merge != CellMerge::None)
    }
}

/// Formatting record carried by every document node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatState {
    // Character properties
    pub font: Option<FontRef>,
    /// Font size in half-points
    pub font_size: Option<u32>,
    /// Foreground color
    pub cf: Option<ColorRef>,
    /// Character background color
    pub cb: Option<ColorRef>,
    pub bold: bool,
    pub italic: bool,
    pub underline: Underline,
    pub strike: Strike,
    pub superscript: bool,
    pub subscript: bool,
    /// Current language (Windows LCID)
    pub lang_cur: Option<u16>,
    pub dir_char: DirState,

    // Paragraph properties
    pub dir_para: DirState,
    pub h_align: HAlign,
    /// Left indent (twips)
    pub li: i64,
    /// Right indent (twips)
    pub ri: i64,
    /// First-line indent (twips)
    pub fi: i64,
    /// Space before (twips)
    pub sb: i64,
    /// Space after (twips)
    pub sa: i64,
    pub cb_para: Option<ColorRef>,
    pub cf_para: Option<ColorRef>,
    pub para_shading: Option<u16>,
    pub para_borders: Borders,

    // List properties
    pub marker: MarkerStyle,
    pub start_index: Option<i64>,
    pub start_index_default: i64,
    /// List override index (`\ls`)
    pub ils: Option<i64>,

    // Table properties
    pub row_format: Option<RowFormat>,
}

impl Default for FormatState {
    fn default() -> Self {
        Self {
            font: None,
            font_size: None,
            cf: None,
            cb: None,
            bold: false,
            italic: false,
            underline: Underline::None,
            strike: Strike::None,
            superscript: false,
            subscript: false,
            lang_cur: None,
            dir_char: DirState::Default,
            dir_para: DirState::Default,
            h_align: HAlign::Default,
            li: 0,
            ri: 0,
            fi: 0,
            sb: 0,
            sa: 0,
            cb_para: None,
            cf_para: None,
            para_shading: None,
            para_borders: Borders::default(),
            marker: MarkerStyle::None,
            start_index: None,
            start_index_default: 1,
            ils: None,
            row_format: None,
        }
    }
}

/// Baseline compared against by paragraphs and parentless nodes.
pub(crate) static EMPTY_FORMAT_STATE: once_cell::sync::Lazy<FormatState> =
    once_cell::sync::Lazy::new(FormatState::default);

impl FormatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of `self` for a new block-level scope.
    ///
    /// Character properties carry over; indents, spacing, marker and paragraph
    /// background restart.
    pub fn for_new_block(&self) -> Self {
        let mut fs = self.clone();
        fs.li = 0;
        fs.ri = 0;
        fs.sb = 0;
        fs.sa = 0;
        fs.fi = 0;
        fs.marker = MarkerStyle::None;
        fs.cb_para = None;
        fs
    }

    #[inline]
    pub fn has_row_format(&self) -> bool {
        self.row_format.is_some()
    }

    #[inline]
    pub fn has_para_border(&self) -> bool {
        self.para_borders.has_any_border()
    }

    /// Whether `self` differs from `base` in any property that font emission
    /// reports.
    pub(crate) fn font_differs_from(&self, base: &FormatState) -> bool {
        self.strike != base.strike
            || self.underline != base.underline
            || (self.font != base.font && self.font.is_some())
            || (self.font_size != base.font_size && self.font_size.is_some())
            || self.cf != base.cf
            || self.bold != base.bold
            || self.italic != base.italic
            || self.lang_cur != base.lang_cur
    }
}
