//! Breathing effect
//!
//! Fades a single color between a minimum brightness and full brightness
//! along a sine curve.

use core::f64::consts::TAU;

use super::{DEFAULT_COLOR, Effect, EffectCore, EffectInfo};
use crate::{
    color::scale_color,
    param::ParamSchema,
};

/// Phase advance per frame at speed 1, radians
const PHASE_STEP: f64 = 0.03;

const PARAMS: &[ParamSchema] = &[
    ParamSchema::color("color", "Color", DEFAULT_COLOR),
    ParamSchema::number("speed", "Speed", 1.0, 0.2, 3.0, 0.1).with_description("Breathing speed"),
    ParamSchema::number("minBrightness", "Min Brightness", 10.0, 0.0, 100.0, 5.0)
        .with_description("Minimum brightness percentage"),
];

const INFO: EffectInfo = EffectInfo::new_static(
    "breathing",
    "Breathing",
    "Gentle pulsing brightness effect",
    PARAMS,
);

#[derive(Debug, Clone)]
pub struct BreathingEffect {
    core: EffectCore,
    /// Sine phase in radians, kept in 0..2π
    phase: f64,
}

impl Default for BreathingEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl BreathingEffect {
    pub fn new() -> Self {
        Self {
            core: EffectCore::new(PARAMS),
            phase: 0.0,
        }
    }

    /// Brightness (0.0-1.0) for a phase and a minimum brightness fraction
    pub fn brightness_at(phase: f64, min: f64) -> f64 {
        min + ((libm::sin(phase) + 1.0) / 2.0) * (1.0 - min)
    }

    pub const fn phase(&self) -> f64 {
        self.phase
    }
}

impl Effect for BreathingEffect {
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
        self.phase = 0.0;
    }

    fn render(&mut self, _frame: u64, _delta_ms: f64) {
        let color = self.core.color("color");
        let speed = self.core.number("speed");
        let min = (self.core.number("minBrightness") / 100.0).clamp(0.0, 1.0);

        self.phase = (self.phase + speed * PHASE_STEP).rem_euclid(TAU);

        let brightness = Self::brightness_at(self.phase, min);
        self.core.fill(scale_color(color, brightness));
    }
}
