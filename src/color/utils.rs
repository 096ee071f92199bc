use crate::{
    color::{Rgb, RgbTuple},
    math8::{scale_brightness, scale_unit},
};

/// Scale every channel of a color by `brightness` (0-255)
#[inline]
pub const fn dim_color(color: Rgb, brightness: u8) -> Rgb {
    Rgb {
        r: scale_brightness(color.r, brightness),
        g: scale_brightness(color.g, brightness),
        b: scale_brightness(color.b, brightness),
    }
}

/// Scale every channel of a color by a unit fraction (0.0-1.0)
pub fn scale_color(color: Rgb, factor: f64) -> Rgb {
    Rgb {
        r: scale_unit(color.r, factor),
        g: scale_unit(color.g, factor),
        b: scale_unit(color.b, factor),
    }
}

/// Create an RGB color from a u32 value (0xRRGGBB format)
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}

/// Pack an RGB color into a u32 value (0xRRGGBB format)
#[allow(clippy::cast_lossless)]
pub const fn rgb_to_u32(color: Rgb) -> u32 {
    ((color.r as u32) << 16) | ((color.g as u32) << 8) | color.b as u32
}

pub const fn rgb_from_tuple(tuple: RgbTuple) -> Rgb {
    Rgb {
        r: tuple[0],
        g: tuple[1],
        b: tuple[2],
    }
}

pub const fn rgb_to_tuple(color: Rgb) -> RgbTuple {
    [color.r, color.g, color.b]
}
