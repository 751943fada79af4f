//! List marker styles and the marker chains used to reopen lists.

/// Numbering or bullet style of a list level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerStyle {
    /// No marker style assigned
    #[default]
    None,
    /// Marker suppressed
    Hidden,
    /// Arabic numerals (1, 2, 3...)
    Arabic,
    /// Uppercase Roman numerals (I, II, III...)
    UpperRoman,
    /// Lowercase Roman numerals (i, ii, iii...)
    LowerRoman,
    /// Uppercase letters (A, B, C...)
    UpperAlpha,
    /// Lowercase letters (a, b, c...)
    LowerAlpha,
    /// Ordinal numbers (1st, 2nd, 3rd...)
    Ordinal,
    /// Cardinal text (One, Two, Three...)
    CardinalText,
    /// Ordinal text (First, Second, Third...)
    OrdinalText,
    /// Filled bullet
    Bullet,
    /// Hollow circle
    Circle,
    /// Filled square
    Square,
    /// Hollow square
    Box,
}

impl MarkerStyle {
    #[inline]
    pub fn is_bullet(self) -> bool {
        matches!(self, MarkerStyle::Bullet)
    }

    /// `MarkerStyle` attribute value of a `List` element.
    pub fn xaml_name(self) -> &'static str {
        match self {
            MarkerStyle::None | MarkerStyle::Hidden => "None",
            MarkerStyle::Bullet => "Disc",
            MarkerStyle::Circle => "Circle",
            MarkerStyle::Square => "Square",
            MarkerStyle::Box => "Box",
            MarkerStyle::UpperRoman => "UpperRoman",
            MarkerStyle::LowerRoman => "LowerRoman",
            MarkerStyle::UpperAlpha => "UpperLatin",
            MarkerStyle::LowerAlpha => "LowerLatin",
            MarkerStyle::Arabic
            | MarkerStyle::Ordinal
            | MarkerStyle::CardinalText
            | MarkerStyle::OrdinalText => "Decimal",
        }
    }
}

/// One list level in a marker chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerListEntry {
    pub marker: MarkerStyle,
    /// List override index (`\ls`)
    pub ils: Option<i64>,
    pub start_index_override: Option<i64>,
    pub start_index_default: i64,
    pub virtual_list_level: Option<u32>,
}

/// Ordered chain of list markers, outermost list first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerList {
    entries: Vec<MarkerListEntry>,
}

impl MarkerList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn push(&mut self, entry: MarkerListEntry) {
        self.entries.push(entry);
    }

    #[inline]
    pub fn insert(&mut self, index: usize, entry: MarkerListEntry) {
        self.entries.insert(index, entry);
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&MarkerListEntry> {
        self.entries.get(index)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn entries(&self) -> &[MarkerListEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &MarkerListEntry> {
        self.entries.iter()
    }
}
