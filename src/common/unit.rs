//! Unit conversion utilities.
//!
//! RTF measures lengths in twips (1/20 point, 1/1440 inch); flow-content
//! markup uses device-independent pixels (1/96 inch).

pub const TWIPS_PER_INCH: i64 = 1440;
pub const PX_PER_INCH: i64 = 96;
pub const TWIPS_PER_PX: i64 = TWIPS_PER_INCH / PX_PER_INCH;

#[inline]
pub fn twip_to_px_f64(twips: i64) -> f64 {
    twips as f64 / TWIPS_PER_PX as f64
}

/// Append `value` rounded to two decimals, without trailing zeros.
pub fn push_decimal(out: &mut String, value: f64) {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        let mut buf = itoa::Buffer::new();
        out.push_str(buf.format(rounded as i64));
    } else {
        let mut buf = ryu::Buffer::new();
        out.push_str(buf.format(rounded));
    }
}

/// Append a twip length as pixels.
#[inline]
pub fn push_twip_px(out: &mut String, twips: i64) {
    push_decimal(out, twip_to_px_f64(twips));
}

/// Append a twip length as pixels, clamping negatives to zero.
#[inline]
pub fn push_positive_twip_px(out: &mut String, twips: i64) {
    push_twip_px(out, twips.max(0));
}

/// Append a plain integer.
#[inline]
pub fn push_int(out: &mut String, value: i64) {
    let mut buf = itoa::Buffer::new();
    out.push_str(buf.format(value));
}
