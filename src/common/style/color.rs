use std::fmt;

/// Opaque RGB color.
///
/// RTF color tables carry only red, green and blue; XAML brushes are written
/// in `#AARRGGBB` form with full alpha.
///
/// # Examples
///
/// ```rust
/// use rtfflow::common::RGBColor;
///
/// let orange = RGBColor::new(255, 128, 0);
/// assert_eq!(orange.to_argb_hex(), "#FFFF8000");
/// assert_eq!(RGBColor::from_components(300, -4, 17), RGBColor::new(255, 0, 17));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RGBColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RGBColor {
    pub const BLACK: RGBColor = RGBColor::new(0, 0, 0);
    pub const WHITE: RGBColor = RGBColor::new(0xFF, 0xFF, 0xFF);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from `\redN\greenN\blueN` parameters, clamping each to 0..=255.
    pub fn from_components(red: i32, green: i32, blue: i32) -> Self {
        let clamp = |v: i32| v.clamp(0, 0xFF) as u8;
        Self::new(clamp(red), clamp(green), clamp(blue))
    }

    /// Opaque `#AARRGGBB` brush value.
    pub fn to_argb_hex(&self) -> String {
        format!("#FF{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for RGBColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
