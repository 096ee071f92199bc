//! Fire simulation effect
//!
//! Classic one-dimensional heat model: every frame each cell cools a little,
//! heat drifts upward from the base and new sparks ignite near the bottom.
//! Heat is mapped to color through a black-red-yellow-white ramp.

use super::{Effect, EffectCore, EffectInfo};
use crate::{color::Rgb, param::ParamSchema};

/// Sparks only ignite in the lowest cells
const SPARK_ZONE: usize = 7;

const PARAMS: &[ParamSchema] = &[
    ParamSchema::number("cooling", "Cooling", 55.0, 20.0, 100.0, 5.0)
        .with_description("How fast the fire cools down"),
    ParamSchema::number("sparking", "Sparking", 120.0, 50.0, 200.0, 10.0)
        .with_description("Chance of new sparks"),
];

const INFO: EffectInfo = EffectInfo::new_static(
    "fire",
    "Fire",
    "Realistic fire simulation",
    PARAMS,
);

#[derive(Debug, Clone)]
pub struct FireEffect {
    core: EffectCore,
    /// Per-LED heat, 0.0-255.0
    heat: Vec<f64>,
    seed: u64,
    rng: fastrand::Rng,
}

impl Default for FireEffect {
    fn default() -> Self {
        Self::with_seed(fastrand::u64(..))
    }
}

impl FireEffect {
    /// Fire with a fixed random sequence, restarted on every `init`
    pub fn with_seed(seed: u64) -> Self {
        Self {
            core: EffectCore::new(PARAMS),
            heat: Vec::new(),
            seed,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn heat(&self) -> &[f64] {
        &self.heat
    }

    /// Map a heat value (0-255) onto the fire color ramp
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn heat_color(heat: f64) -> Rgb {
        let t = libm::floor(heat.clamp(0.0, 255.0));
        let ramp = |v: f64| libm::floor(v / 85.0 * 255.0).clamp(0.0, 255.0) as u8;
        if t < 85.0 {
            Rgb::new(ramp(t), 0, 0)
        } else if t < 170.0 {
            Rgb::new(255, ramp(t - 85.0), 0)
        } else {
            Rgb::new(255, 255, ramp(t - 170.0))
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn cool(&mut self, cooling: f64) {
        let max_cooldown = (cooling * 10.0) / self.heat.len() as f64 + 2.0;
        for cell in &mut self.heat {
            let cooldown = self.rng.f64() * max_cooldown;
            *cell = (*cell - cooldown).max(0.0);
        }
    }

    /// Heat rises: each cell takes a weighted average of the two below it
    fn diffuse(&mut self) {
        for i in (2..self.heat.len()).rev() {
            self.heat[i] = (self.heat[i - 1] + self.heat[i - 2] * 2.0) / 3.0;
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn ignite(&mut self, sparking: f64) {
        if self.heat.is_empty() || self.rng.f64() * 255.0 >= sparking {
            return;
        }
        let zone = SPARK_ZONE.min(self.heat.len());
        let y = self.rng.usize(..zone);
        let boost = 160.0 + self.rng.f64() * 95.0;
        self.heat[y] = (self.heat[y] + boost).min(255.0);
    }
}

impl Effect for FireEffect {
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
        self.heat.clear();
        self.heat.resize(self.core.led_count(), 0.0);
        self.rng.seed(self.seed);
    }

    fn render(&mut self, _frame: u64, _delta_ms: f64) {
        if self.heat.is_empty() {
            return;
        }

        self.cool(self.core.number("cooling"));
        self.diffuse();
        self.ignite(self.core.number("sparking"));

        for (led, heat) in self.core.pixels_mut().iter_mut().zip(&self.heat) {
            *led = Self::heat_color(*heat);
        }
    }
}
