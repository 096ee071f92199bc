//! Static color fill effect
//!
//! Fills all LEDs with a single solid color.

use super::{DEFAULT_COLOR, Effect, EffectCore, EffectInfo};
use crate::param::ParamSchema;

const PARAMS: &[ParamSchema] = &[ParamSchema::color("color", "Color", DEFAULT_COLOR)];

const INFO: EffectInfo = EffectInfo::new_static(
    "solid",
    "Solid Color",
    "Display a single solid color across all LEDs",
    PARAMS,
);

/// Static color effect - fills all LEDs with one color
#[derive(Debug, Clone)]
pub struct SolidEffect {
    core: EffectCore,
}

impl Default for SolidEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl SolidEffect {
    pub fn new() -> Self {
        Self {
            core: EffectCore::new(PARAMS),
        }
    }
}

impl Effect for SolidEffect {
    fn info(&self) -> EffectInfo {
        INFO
    }

    fn core(&self) -> &EffectCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EffectCore {
        &mut self.core
    }

    fn render(&mut self, _frame: u64, _delta_ms: f64) {
        let color = self.core.color("color");
        self.core.fill(color);
    }
}
