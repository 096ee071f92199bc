/// Scale an 8-bit channel by a brightness (0-255 = 0.0-1.0)
///
/// Computes `round(value * brightness / 255)` in integer math, so full
/// brightness is the identity and zero brightness is black.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
pub const fn scale_brightness(value: u8, brightness: u8) -> u8 {
    let product = value as u32 * brightness as u32;
    ((product + 127) / 255) as u8
}

/// Scale an 8-bit channel by a unit fraction (0.0-1.0), rounding once
///
/// Out of range factors are clamped.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn scale_unit(value: u8, factor: f64) -> u8 {
    libm::round(f64::from(value) * factor.clamp(0.0, 1.0)) as u8
}
