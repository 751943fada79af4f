//! Lookup services consulted while serializing nodes.

use super::types::{ColorRef, ColorTable, ColorTableEntry, FontRef, FontTable, FontTableEntry};
use crate::common::style::RGBColor;

/// Full shading, in hundredths of a percent.
pub const SHADING_FULL: u32 = 10_000;

/// Read-only font and color lookups used during serialization.
pub trait ConverterState {
    /// Font entry registered under `\f<index>`.
    fn font_entry(&self, index: FontRef) -> Option<&FontTableEntry>;

    /// Color entry at `index` of the color table.
    fn color_entry(&self, index: ColorRef) -> Option<&ColorTableEntry>;

    /// Concrete color of `index`, ignoring automatic entries.
    fn solid_color(&self, index: Option<ColorRef>) -> Option<RGBColor> {
        index
            .and_then(|i| self.color_entry(i))
            .filter(|e| !e.is_auto)
            .map(|e| e.color)
    }

    /// Effective fill for a background/pattern color pair under `shading`.
    ///
    /// Without shading the background color is used as-is. With shading the
    /// two colors are mixed in proportion, white and black standing in for a
    /// missing background and pattern color.
    fn color_to_use(
        &self,
        cb: Option<ColorRef>,
        cf: Option<ColorRef>,
        shading: Option<u16>,
    ) -> Option<RGBColor> {
        let back = self.solid_color(cb);
        let Some(shade) = shading else {
            return back;
        };
        let shade = u32::from(shade).min(SHADING_FULL);
        let fore = self.solid_color(cf);

        let mix = |f: &dyn Fn(u8, u8) -> u32| {
            let b = back.unwrap_or(RGBColor::WHITE);
            let c = fore.unwrap_or(RGBColor::BLACK);
            RGBColor::new(f(b.r, c.r) as u8, f(b.g, c.g) as u8, f(b.b, c.b) as u8)
        };

        let color = match (back, fore) {
            (None, None) => {
                let grey = (255 - 255 * shade / SHADING_FULL) as u8;
                RGBColor::new(grey, grey, grey)
            },
            // Pattern color fades towards white as shading drops
            (None, Some(_)) => mix(&|_, c| {
                let c = u32::from(c);
                c + (255 - c) * (SHADING_FULL - shade) / SHADING_FULL
            }),
            // Background darkens as shading rises
            (Some(_), None) => mix(&|b, _| {
                let b = u32::from(b);
                b - b * shade / SHADING_FULL
            }),
            (Some(_), Some(_)) => mix(&|b, c| {
                u32::from(b) * (SHADING_FULL - shade) / SHADING_FULL
                    + u32::from(c) * shade / SHADING_FULL
            }),
        };
        Some(color)
    }
}

/// Font and color tables of one document.
#[derive(Debug, Clone, Default)]
pub struct DocumentTables {
    pub fonts: FontTable,
    pub colors: ColorTable,
}

impl DocumentTables {
    pub fn new(fonts: FontTable, colors: ColorTable) -> Self {
        Self { fonts, colors }
    }
}

impl ConverterState for DocumentTables {
    #[inline]
    fn font_entry(&self, index: FontRef) -> Option<&FontTableEntry> {
        self.fonts.find_entry_by_index(index)
    }

    #[inline]
    fn color_entry(&self, index: ColorRef) -> Option<&ColorTableEntry> {
        self.colors.entry_at(index)
    }
}
