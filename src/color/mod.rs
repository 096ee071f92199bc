mod hsl;
mod palette;
mod utils;

use smart_leds::RGB8;

pub use hsl::hsl_to_rgb;
pub use palette::{lerp_color, sample_palette};
pub use utils::{dim_color, rgb_from_tuple, rgb_from_u32, rgb_to_tuple, rgb_to_u32, scale_color};

/// Single LED color, 8 bits per channel
pub type Rgb = RGB8;

/// Color as it appears in effect parameters: `[r, g, b]`
pub type RgbTuple = [u8; 3];

/// Fully dark pixel
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
