//! Floating point HSL to RGB conversion
//!
//! The wave effects (rainbow, plasma, theater chase) produce hues on a
//! 0-360 degree circle, which is finer than the 8-bit hue wheel of
//! `smart_leds::hsv`, so they go through the classic HSL formula instead.

use crate::color::Rgb;

/// Convert HSL to RGB
///
/// # Arguments
/// * `hue` - Hue in degrees (0-360)
/// * `saturation` - Saturation in percent (0-100)
/// * `lightness` - Lightness in percent (0-100)
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> Rgb {
    let h = hue / 360.0;
    let s = saturation / 100.0;
    let l = lightness / 100.0;

    if s == 0.0 {
        let gray = to_channel(l);
        return Rgb {
            r: gray,
            g: gray,
            b: gray,
        };
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Rgb {
        r: to_channel(hue_to_channel(p, q, h + 1.0 / 3.0)),
        g: to_channel(hue_to_channel(p, q, h)),
        b: to_channel(hue_to_channel(p, q, h - 1.0 / 3.0)),
    }
}

/// One channel of the six-sector piecewise HSL ramp
fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(value: f64) -> u8 {
    libm::round(value * 255.0).clamp(0.0, 255.0) as u8
}
