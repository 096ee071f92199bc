//! Plasma effect
//!
//! Three overlapping sine waves mapped onto the hue circle.

use super::{Effect, EffectCore, EffectInfo};
use crate::{color::hsl_to_rgb, param::ParamSchema};

/// Time advance per frame at speed 1
const TIME_STEP: f64 = 0.02;

const PARAMS: &[ParamSchema] = &[
    ParamSchema::number("speed", "Speed", 1.0, 0.2, 3.0, 0.1).with_description("Animation speed"),
    ParamSchema::number("scale", "Scale", 1.0, 0.5, 3.0, 0.1).with_description("Pattern scale"),
];

const INFO: EffectInfo = EffectInfo::new_static(
    "plasma",
    "Plasma",
    "Smooth flowing plasma effect",
    PARAMS,
);

#[derive(Debug, Clone)]
pub struct PlasmaEffect {
    core: EffectCore,
    time: f64,
}

impl Default for PlasmaEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl PlasmaEffect {
    pub fn new() -> Self {
        Self {
            core: EffectCore::new(PARAMS),
            time: 0.0,
        }
    }

    /// Plasma hue (0-360) at strip position `x` (0.0-1.0)
    pub fn hue_at(x: f64, time: f64, scale: f64) -> f64 {
        let wave = x * 10.0 * scale;
        let v1 = libm::sin(wave + time);
        let v2 = libm::sin(wave * 0.5 + time * 1.3);
        let v3 = libm::sin((wave + time + libm::sin(time * 0.5)) * 0.5);
        let value = (v1 + v2 + v3) / 3.0;
        (value + 1.0) / 2.0 * 360.0
    }
}

impl Effect for PlasmaEffect {
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

    #[allow(clippy::cast_precision_loss)]
    fn render(&mut self, _frame: u64, _delta_ms: f64) {
        let speed = self.core.number("speed");
        let scale = self.core.number("scale");

        self.time += speed * TIME_STEP;

        let len = self.core.led_count() as f64;
        let time = self.time;
        for (i, led) in self.core.pixels_mut().iter_mut().enumerate() {
            let hue = Self::hue_at(i as f64 / len, time, scale);
            *led = hsl_to_rgb(hue, 100.0, 50.0);
        }
    }
}
