//! Aurora effect
//!
//! Smooth flowing multi-layer waves sampled through a palette, simulating
//! the organic motion of northern lights. An optional shimmer adds a fast
//! low-amplitude ripple on top.

use super::{Effect, EffectCore, EffectInfo};
use crate::{
    color::{RgbTuple, sample_palette, scale_color},
    param::ParamSchema,
};

// Green -> cyan -> violet -> teal
const PALETTE: &[RgbTuple] = &[[0, 255, 100], [0, 200, 255], [100, 0, 255], [0, 255, 200]];

/// Time advance per frame at speed 1
const TIME_STEP: f64 = 0.02;

const MAX_LAYERS: f64 = 16.0;

const PARAMS: &[ParamSchema] = &[
    ParamSchema::palette("color", "Colors", PALETTE),
    ParamSchema::number("speed", "Speed", 1.0, 0.1, 3.0, 0.1).with_description("Animation speed"),
    ParamSchema::number("complexity", "Complexity", 3.0, 1.0, 5.0, 1.0)
        .with_description("Number of overlapping wave layers"),
    ParamSchema::number("stretch", "Stretch", 1.0, 0.2, 4.0, 0.1)
        .with_description("Spatial frequency of the waves"),
    ParamSchema::number("shimmer", "Shimmer", 0.0, 0.0, 1.0, 0.1)
        .with_description("Fast brightness ripple"),
    ParamSchema::boolean("reverse", "Reverse", false),
];

const INFO: EffectInfo = EffectInfo::new_static(
    "aurora",
    "Aurora",
    "Flowing northern lights with layered waves",
    PARAMS,
);

/// Aurora effect with layered flowing gradients
#[derive(Debug, Clone)]
pub struct AuroraEffect {
    core: EffectCore,
    time: f64,
}

impl Default for AuroraEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl AuroraEffect {
    pub fn new() -> Self {
        Self {
            core: EffectCore::new(PARAMS),
            time: 0.0,
        }
    }

    /// Layered wave value at strip position `x`, normalized to 0.0-1.0
    #[allow(clippy::cast_precision_loss)]
    pub fn wave_at(x: f64, time: f64, layers: usize, stretch: f64) -> f64 {
        let sum: f64 = (0..layers)
            .map(|w| {
                let w = w as f64;
                libm::sin(x * 10.0 * stretch * (w + 1.0) * 0.5 + time * (1.0 + w * 0.3) + w * 0.7)
            })
            .sum();
        let value = sum / layers as f64;
        (value + 1.0) / 2.0
    }

    /// Brightness factor of the shimmer ripple, 1.0 when shimmer is off
    pub fn shimmer_at(x: f64, time: f64, shimmer: f64) -> f64 {
        1.0 - shimmer * 0.3 * (0.5 + 0.5 * libm::sin(x * 50.0 + time * 5.0))
    }
}

impl Effect for AuroraEffect {
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
        self.time = 0.0;
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn render(&mut self, _frame: u64, _delta_ms: f64) {
        let speed = self.core.number("speed");
        let layers = libm::round(self.core.number("complexity")).clamp(1.0, MAX_LAYERS) as usize;
        let stretch = self.core.number("stretch");
        let shimmer = self.core.number("shimmer").clamp(0.0, 1.0);
        let direction = if self.core.boolean("reverse") { -1.0 } else { 1.0 };

        self.time += speed * TIME_STEP * direction;

        let palette = self.core.colors("color").to_vec();
        let len = self.core.led_count() as f64;
        let time = self.time;
        for (i, led) in self.core.pixels_mut().iter_mut().enumerate() {
            let x = i as f64 / len;
            let color = sample_palette(&palette, Self::wave_at(x, time, layers, stretch));
            *led = if shimmer > 0.0 {
                scale_color(color, Self::shimmer_at(x, time, shimmer))
            } else {
                color
            };
        }
    }
}
