use crate::color::{Rgb, RgbTuple, rgb_from_tuple};

/// Linear interpolation between two colors, `t` in 0.0-1.0
///
/// Channels are rounded to the nearest integer.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn lerp_color(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let lerp = |a: u8, b: u8| -> u8 {
        let a = f64::from(a);
        let b = f64::from(b);
        libm::round(a + (b - a) * t).clamp(0.0, 255.0) as u8
    };
    Rgb {
        r: lerp(from.r, to.r),
        g: lerp(from.g, to.g),
        b: lerp(from.b, to.b),
    }
}

/// Sample an ordered palette at position `t` (0.0-1.0)
///
/// The position is spread over `n - 1` segments: `t * (n - 1)` selects the
/// segment and the fractional part blends its two ends. An empty palette
/// yields black, a single entry yields that entry.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn sample_palette(palette: &[RgbTuple], t: f64) -> Rgb {
    match palette {
        [] => Rgb::default(),
        [only] => rgb_from_tuple(*only),
        _ => {
            let last = palette.len() - 1;
            let scaled = t.clamp(0.0, 1.0) * last as f64;
            let index = libm::floor(scaled) as usize;
            let frac = scaled - libm::floor(scaled);

            let from = rgb_from_tuple(palette[index.min(last)]);
            let to = rgb_from_tuple(palette[(index + 1).min(last)]);
            lerp_color(from, to, frac)
        }
    }
}
