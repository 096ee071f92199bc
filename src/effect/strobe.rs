//! Strobe effect
//!
//! Square wave between the color and the background color. Timing follows
//! real elapsed time rather than frame count.

use super::{DEFAULT_BACKGROUND, DEFAULT_COLOR, Effect, EffectCore, EffectInfo};
use crate::param::ParamSchema;

const PARAMS: &[ParamSchema] = &[
    ParamSchema::color("color", "Color", DEFAULT_COLOR),
    ParamSchema::color("backgroundColor", "Background Color", DEFAULT_BACKGROUND),
    ParamSchema::number("frequency", "Frequency", 5.0, 1.0, 20.0, 1.0)
        .with_description("Flashes per second"),
    ParamSchema::number("dutyCycle", "Duty Cycle", 50.0, 10.0, 90.0, 5.0)
        .with_description("Percentage of time the light is on"),
];

const INFO: EffectInfo = EffectInfo::new_static(
    "strobe",
    "Strobe",
    "Flashing strobe light effect",
    PARAMS,
);

#[derive(Debug, Clone)]
pub struct StrobeEffect {
    core: EffectCore,
    /// Position within the current cycle, 0.0-1.0
    phase: f64,
}

impl Default for StrobeEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl StrobeEffect {
    pub fn new() -> Self {
        Self {
            core: EffectCore::new(PARAMS),
            phase: 0.0,
        }
    }

    pub const fn phase(&self) -> f64 {
        self.phase
    }
}

impl Effect for StrobeEffect {
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

    fn render(&mut self, _frame: u64, delta_ms: f64) {
        let frequency = self.core.number("frequency");
        let duty = self.core.number("dutyCycle") / 100.0;

        self.phase = (self.phase + frequency * delta_ms / 1000.0).rem_euclid(1.0);

        let color = if self.phase < duty {
            self.core.color("color")
        } else {
            self.core.color("backgroundColor")
        };
        self.core.fill(color);
    }
}
