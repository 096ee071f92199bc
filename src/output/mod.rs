//! Output sink
//!
//! [`OutputSink`] owns the strip-sized pixel mirror, applies global
//! brightness and channel order, and hands finished frames to an
//! [`OutputDriver`]: real hardware when hardware detection succeeds, the
//! [`MockDriver`] otherwise.

mod hardware;
mod mock;

use serde::{Deserialize, Serialize};

pub use hardware::{DeviceDriver, SmartLedsDriver};
pub use mock::MockDriver;
use crate::{
    color::{BLACK, Rgb, dim_color},
    error::OutputError,
};

/// Abstract LED driver
///
/// Implement this trait to support different hardware. Colors arrive
/// already dimmed and in the strip's channel order.
pub trait OutputDriver: Send {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]) -> Result<(), OutputError>;

    /// Release the hardware
    fn shutdown(&mut self) {}
}

/// Physical channel order of the strip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorOrder {
    Rgb,
    Rbg,
    #[default]
    Grb,
    Gbr,
    Brg,
    Bgr,
}

impl ColorOrder {
    /// Permute `color` so that its `r`, `g`, `b` slots carry the channels in
    /// wire order
    pub const fn apply(self, color: Rgb) -> Rgb {
        let Rgb { r, g, b } = color;
        let (first, second, third) = match self {
            Self::Rgb => (r, g, b),
            Self::Rbg => (r, b, g),
            Self::Grb => (g, r, b),
            Self::Gbr => (g, b, r),
            Self::Brg => (b, r, g),
            Self::Bgr => (b, g, r),
        };
        Rgb {
            r: first,
            g: second,
            b: third,
        }
    }
}

/// Strip hardware configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StripConfig {
    pub led_count: usize,
    /// Data pin
    pub gpio: u8,
    pub dma: u8,
    /// Initial global brightness
    pub brightness: u8,
    pub color_order: ColorOrder,
    /// Device node that receives raw frames
    pub device: String,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            led_count: 202,
            gpio: 19,
            dma: 10,
            brightness: 255,
            color_order: ColorOrder::Grb,
            device: "/dev/ledstrip0".into(),
        }
    }
}

pub struct OutputSink {
    driver: Box<dyn OutputDriver>,
    /// Undimmed frame as set by the caller
    pixels: Vec<Rgb>,
    /// Scratch buffer for the dimmed, reordered frame
    wire: Vec<Rgb>,
    brightness: u8,
    color_order: ColorOrder,
    mock: bool,
}

impl OutputSink {
    /// Sink over a known driver
    pub fn new(config: &StripConfig, driver: Box<dyn OutputDriver>) -> Self {
        Self::with_driver(config, driver, false)
    }

    /// Sink over the mock driver
    pub fn mock(config: &StripConfig) -> Self {
        Self::with_driver(config, Box::new(MockDriver::new(config.led_count)), true)
    }

    /// Detect hardware, falling back to the mock driver when it fails
    pub fn open<D>(config: &StripConfig, detect: D) -> Self
    where
        D: FnOnce(&StripConfig) -> Result<Box<dyn OutputDriver>, OutputError>,
    {
        match detect(config) {
            Ok(driver) => {
                log::info!(
                    "output: hardware driver ready ({} LEDs, gpio {}, dma {})",
                    config.led_count,
                    config.gpio,
                    config.dma
                );
                Self::new(config, driver)
            }
            Err(err) => {
                log::warn!("output: {err}, using mock driver");
                Self::mock(config)
            }
        }
    }

    fn with_driver(config: &StripConfig, driver: Box<dyn OutputDriver>, mock: bool) -> Self {
        Self {
            driver,
            pixels: vec![BLACK; config.led_count],
            wire: Vec::with_capacity(config.led_count),
            brightness: config.brightness,
            color_order: config.color_order,
            mock,
        }
    }

    pub fn led_count(&self) -> usize {
        self.pixels.len()
    }

    pub const fn is_mock(&self) -> bool {
        self.mock
    }

    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Change the global brightness applied on the next render
    pub const fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Out of range indices are ignored
    pub fn set_pixel(&mut self, index: usize, color: Rgb) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Replace the whole frame
    ///
    /// A frame of the wrong length is ignored.
    pub fn set_all(&mut self, colors: &[Rgb]) {
        if colors.len() == self.pixels.len() {
            self.pixels.copy_from_slice(colors);
        } else {
            log::trace!(
                "output: ignoring frame of {} pixels, strip has {}",
                colors.len(),
                self.pixels.len()
            );
        }
    }

    /// Transmit the current frame
    pub fn render(&mut self) -> Result<(), OutputError> {
        let brightness = self.brightness;
        let order = self.color_order;
        self.wire.clear();
        self.wire.extend(self.pixels.iter().map(|&color| {
            let color = if brightness < u8::MAX {
                dim_color(color, brightness)
            } else {
                color
            };
            order.apply(color)
        }));
        self.driver.write(&self.wire)
    }

    /// Blank the strip
    pub fn clear(&mut self) -> Result<(), OutputError> {
        self.fill(BLACK);
        self.render()
    }

    /// Blank the strip and release the driver
    pub fn shutdown(&mut self) {
        if let Err(err) = self.clear() {
            log::warn!("output: failed to blank strip on shutdown: {err}");
        }
        self.driver.shutdown();
    }
}
