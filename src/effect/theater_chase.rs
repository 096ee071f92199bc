//! Theater chase effect
//!
//! Lit groups separated by dark gaps march along the strip in discrete
//! steps. Each step picks fresh group colors from the palette, or, in
//! rainbow mode, colors every LED by its position on the hue circle.

use super::{DEFAULT_BACKGROUND, DEFAULT_COLOR, Effect, EffectCore, EffectInfo};
use crate::{
    color::{Rgb, hsl_to_rgb, rgb_from_tuple},
    param::ParamSchema,
};

const PARAMS: &[ParamSchema] = &[
    ParamSchema::palette("color", "Colors", DEFAULT_COLOR),
    ParamSchema::color("backgroundColor", "Background Color", DEFAULT_BACKGROUND),
    ParamSchema::number("speed", "Speed", 5.0, 1.0, 15.0, 1.0)
        .with_description("Steps per second"),
    ParamSchema::number("step", "Step", 1.0, 1.0, 5.0, 1.0)
        .with_description("LEDs advanced per step"),
    ParamSchema::number("spacing", "Spacing", 3.0, 1.0, 10.0, 1.0)
        .with_description("Dark LEDs between groups"),
    ParamSchema::number("groupSize", "Group Size", 1.0, 1.0, 10.0, 1.0)
        .with_description("Lit LEDs per group"),
    ParamSchema::boolean("rainbow", "Rainbow", false)
        .with_description("Color lit LEDs by position instead of the palette"),
];

const INFO: EffectInfo = EffectInfo::new_static(
    "theater-chase",
    "Theater Chase",
    "Classic marquee chase lights",
    PARAMS,
);

#[derive(Debug, Clone)]
pub struct TheaterChaseEffect {
    core: EffectCore,
    offset: usize,
    elapsed_ms: f64,
    group_colors: Vec<Rgb>,
    seed: u64,
    rng: fastrand::Rng,
}

impl Default for TheaterChaseEffect {
    fn default() -> Self {
        Self::with_seed(fastrand::u64(..))
    }
}

/// Largest group, gap or step; keeps `spacing + groupSize` far from overflow
const MAX_RUN: f64 = 65_536.0;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole(value: f64) -> usize {
    libm::round(value).clamp(1.0, MAX_RUN) as usize
}

impl TheaterChaseEffect {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            core: EffectCore::new(PARAMS),
            offset: 0,
            elapsed_ms: 0.0,
            group_colors: Vec::new(),
            seed,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    fn group_size(&self) -> usize {
        whole(self.core.number("groupSize"))
    }

    fn pattern_len(&self) -> usize {
        whole(self.core.number("spacing")) + self.group_size()
    }

    fn regenerate_colors(&mut self) {
        let palette = self.core.colors("color");
        let count = self.core.led_count().div_ceil(self.pattern_len()) + 1;

        self.group_colors.clear();
        if palette.is_empty() {
            return;
        }
        for _ in 0..count {
            let pick = self.rng.usize(..palette.len());
            self.group_colors.push(rgb_from_tuple(palette[pick]));
        }
    }
}

impl Effect for TheaterChaseEffect {
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
        self.offset = 0;
        self.elapsed_ms = 0.0;
        self.rng.seed(self.seed);
        self.regenerate_colors();
    }

    #[allow(clippy::cast_precision_loss)]
    fn render(&mut self, _frame: u64, delta_ms: f64) {
        let interval_ms = 1000.0 / self.core.number("speed").max(f64::EPSILON);
        let pattern = self.pattern_len();
        let group_size = self.group_size();

        self.elapsed_ms += delta_ms;
        if self.elapsed_ms >= interval_ms {
            self.elapsed_ms -= interval_ms;
            if self.elapsed_ms >= interval_ms {
                self.elapsed_ms = 0.0;
            }
            self.offset = (self.offset + whole(self.core.number("step"))) % pattern;
            self.regenerate_colors();
        }

        let background = self.core.color("backgroundColor");
        let rainbow = self.core.boolean("rainbow");
        let len = self.core.led_count() as f64;
        let offset = self.offset;
        let group_colors = &self.group_colors;

        for (i, led) in self.core.pixels_mut().iter_mut().enumerate() {
            let shifted = i + offset;
            *led = if shifted % pattern >= group_size {
                background
            } else if rainbow {
                hsl_to_rgb(i as f64 / len * 360.0, 100.0, 50.0)
            } else if group_colors.is_empty() {
                background
            } else {
                group_colors[(shifted / pattern) % group_colors.len()]
            };
        }
    }
}
