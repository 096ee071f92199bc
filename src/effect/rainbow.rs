//! Rainbow cycling effect
//!
//! Spreads the hue circle across the strip and rotates it every frame.

use super::{Effect, EffectCore, EffectInfo};
use crate::{color::hsl_to_rgb, param::ParamSchema};

/// Hue rotation per frame at speed 1, in degrees
const HUE_STEP: f64 = 2.0;

const PARAMS: &[ParamSchema] = &[
    ParamSchema::number("speed", "Speed", 1.0, 0.1, 5.0, 0.1)
        .with_description("Animation speed multiplier"),
    ParamSchema::number("spread", "Spread", 1.0, 0.5, 5.0, 0.1)
        .with_description("How many rainbow cycles across the strip"),
];

const INFO: EffectInfo = EffectInfo::new_static(
    "rainbow",
    "Rainbow",
    "Cycling rainbow colors across the strip",
    PARAMS,
);

#[derive(Debug, Clone)]
pub struct RainbowEffect {
    core: EffectCore,
    /// Hue of the first LED, degrees
    hue_offset: f64,
}

impl Default for RainbowEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl RainbowEffect {
    pub fn new() -> Self {
        Self {
            core: EffectCore::new(PARAMS),
            hue_offset: 0.0,
        }
    }
}

impl Effect for RainbowEffect {
    fn info(&self) -> EffectInfo {
        INFO
    }

    fn core(&self) -> &EffectCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EffectCore {
        &mut self.core
    }

    fn reset(&mut self) {
        self.hue_offset = 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    fn render(&mut self, _frame: u64, _delta_ms: f64) {
        let speed = self.core.number("speed");
        let spread = self.core.number("spread");

        self.hue_offset = (self.hue_offset + speed * HUE_STEP).rem_euclid(360.0);

        let len = self.core.led_count() as f64;
        let hue_offset = self.hue_offset;
        for (i, led) in self.core.pixels_mut().iter_mut().enumerate() {
            let hue = (hue_offset + (i as f64 / len) * 360.0 * spread).rem_euclid(360.0);
            *led = hsl_to_rgb(hue, 100.0, 50.0);
        }
    }
}
