//! Color wipe effect
//!
//! A fill front sweeps forward painting the target color, then sweeps back
//! clearing to the background color, forever.

use super::{DEFAULT_BACKGROUND, DEFAULT_COLOR, Effect, EffectCore, EffectInfo};
use crate::{color::Rgb, param::ParamSchema};

const PARAMS: &[ParamSchema] = &[
    ParamSchema::color("color", "Color", DEFAULT_COLOR),
    ParamSchema::color("backgroundColor", "Background Color", DEFAULT_BACKGROUND),
    ParamSchema::number("speed", "Speed", 2.0, 0.5, 10.0, 0.5)
        .with_description("LEDs per frame"),
];

const INFO: EffectInfo = EffectInfo::new_static(
    "color-wipe",
    "Color Wipe",
    "Progressive color fill across the strip",
    PARAMS,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WipeDirection {
    Filling,
    Clearing,
}

#[derive(Debug, Clone)]
pub struct ColorWipeEffect {
    core: EffectCore,
    /// Fill front, in LEDs
    position: f64,
    direction: WipeDirection,
    /// Color behind the front while filling, ahead of it while clearing
    current: Rgb,
}

impl Default for ColorWipeEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorWipeEffect {
    pub fn new() -> Self {
        Self {
            core: EffectCore::new(PARAMS),
            position: 0.0,
            direction: WipeDirection::Filling,
            current: Rgb::default(),
        }
    }

    pub const fn position(&self) -> f64 {
        self.position
    }

    pub const fn direction(&self) -> WipeDirection {
        self.direction
    }
}

impl Effect for ColorWipeEffect {
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
        self.position = 0.0;
        self.direction = WipeDirection::Filling;
        self.current = self.core.color("backgroundColor");
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn render(&mut self, _frame: u64, _delta_ms: f64) {
        let target = self.core.color("color");
        let background = self.core.color("backgroundColor");
        let speed = self.core.number("speed");
        let len = self.core.led_count() as f64;

        match self.direction {
            WipeDirection::Filling => {
                self.position += speed;
                if self.position >= len {
                    self.position = len;
                    self.direction = WipeDirection::Clearing;
                    self.current = target;
                }
            }
            WipeDirection::Clearing => {
                self.position -= speed;
                if self.position <= 0.0 {
                    self.position = 0.0;
                    self.direction = WipeDirection::Filling;
                    self.current = background;
                }
            }
        }

        let filled = libm::floor(self.position.max(0.0)) as usize;
        let (front, back) = match self.direction {
            WipeDirection::Filling => (target, self.current),
            WipeDirection::Clearing => (self.current, background),
        };
        for (i, led) in self.core.pixels_mut().iter_mut().enumerate() {
            *led = if i < filled { front } else { back };
        }
    }
}
