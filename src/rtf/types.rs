//! Font and color tables referenced by formatting state.

use crate::common::style::RGBColor;

/// Font reference (index into font table).
pub type FontRef = u16;

/// Color reference (index into color table).
pub type ColorRef = u16;

/// Color table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorTableEntry {
    pub color: RGBColor,
    /// Entry stands for the automatic (context) color
    pub is_auto: bool,
}

impl ColorTableEntry {
    #[inline]
    pub const fn new(color: RGBColor) -> Self {
        Self {
            color,
            is_auto: false,
        }
    }

    #[inline]
    pub const fn auto() -> Self {
        Self {
            color: RGBColor::BLACK,
            is_auto: true,
        }
    }
}

/// Color table containing document colors.
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    colors: Vec<ColorTableEntry>,
}

impl ColorTable {
    #[inline]
    pub fn new() -> Self {
        Self { colors: Vec::new() }
    }

    /// Add a color to the table and return its index.
    #[inline]
    pub fn add(&mut self, entry: ColorTableEntry) -> ColorRef {
        let index = self.colors.len() as ColorRef;
        self.colors.push(entry);
        index
    }

    #[inline]
    pub fn add_color(&mut self, color: RGBColor) -> ColorRef {
        self.add(ColorTableEntry::new(color))
    }

    #[inline]
    pub fn entry_at(&self, color_ref: ColorRef) -> Option<&ColorTableEntry> {
        self.colors.get(color_ref as usize)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Font definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FontTableEntry {
    pub name: String,
}

impl FontTableEntry {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Font table indexed by the `\fN` number of each entry.
#[derive(Debug, Clone, Default)]
pub struct FontTable {
    fonts: Vec<Option<FontTableEntry>>,
}

impl FontTable {
    #[inline]
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Add a font to the table at a specific index.
    pub fn insert(&mut self, index: FontRef, font: FontTableEntry) {
        if index as usize >= self.fonts.len() {
            self.fonts.resize(index as usize + 1, None);
        }
        self.fonts[index as usize] = Some(font);
    }

    #[inline]
    pub fn find_entry_by_index(&self, index: FontRef) -> Option<&FontTableEntry> {
        self.fonts.get(index as usize).and_then(Option::as_ref)
    }
}
