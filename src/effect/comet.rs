//! Comet effect
//!
//! A bright head with a fading tail travelling along the strip, either
//! bouncing between the ends or wrapping around.

use super::{DEFAULT_BACKGROUND, DEFAULT_COLOR, Effect, EffectCore, EffectInfo};
use crate::{color::lerp_color, param::ParamSchema};

const PARAMS: &[ParamSchema] = &[
    ParamSchema::color("color", "Color", DEFAULT_COLOR),
    ParamSchema::color("backgroundColor", "Background Color", DEFAULT_BACKGROUND),
    ParamSchema::number("speed", "Speed", 2.0, 0.5, 10.0, 0.5)
        .with_description("LEDs per frame"),
    ParamSchema::number("tailLength", "Tail Length", 20.0, 5.0, 50.0, 1.0)
        .with_description("Length of the comet tail"),
    ParamSchema::boolean("bounce", "Bounce", true)
        .with_description("Reverse direction at the ends instead of wrapping"),
];

const INFO: EffectInfo = EffectInfo::new_static(
    "comet",
    "Comet",
    "Moving light with fading tail",
    PARAMS,
);

#[derive(Debug, Clone)]
pub struct CometEffect {
    core: EffectCore,
    position: f64,
    /// +1 or -1
    direction: f64,
}

impl Default for CometEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl CometEffect {
    pub fn new() -> Self {
        Self {
            core: EffectCore::new(PARAMS),
            position: 0.0,
            direction: 1.0,
        }
    }

    pub const fn position(&self) -> f64 {
        self.position
    }

    pub const fn direction(&self) -> f64 {
        self.direction
    }

    /// Place the head, e.g. to resume a scene
    pub fn set_head(&mut self, position: f64, direction: f64) {
        self.position = position;
        self.direction = if direction < 0.0 { -1.0 } else { 1.0 };
    }

    fn advance(&mut self, speed: f64, tail: f64, bounce: bool) {
        #[allow(clippy::cast_precision_loss)]
        let len = self.core.led_count() as f64;
        self.position += speed * self.direction;

        if bounce {
            if self.position >= len {
                self.position = len - 1.0;
                self.direction = -1.0;
            } else if self.position < 0.0 {
                self.position = 0.0;
                self.direction = 1.0;
            }
        } else if self.direction > 0.0 && self.position >= len + tail {
            self.position = -tail;
        } else if self.direction < 0.0 && self.position < -tail {
            self.position = len - 1.0 + tail;
        }
    }
}

impl Effect for CometEffect {
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
        self.direction = 1.0;
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss
    )]
    fn render(&mut self, _frame: u64, _delta_ms: f64) {
        let color = self.core.color("color");
        let background = self.core.color("backgroundColor");
        let speed = self.core.number("speed");
        let tail = libm::round(self.core.number("tailLength")).max(1.0);
        let bounce = self.core.boolean("bounce");

        self.advance(speed, tail, bounce);
        self.core.fill(background);

        // Pixel `index` is `i` steps behind the head when
        // `index == head - i * direction`
        let head = libm::floor(self.position) as i64;
        let step = self.direction as i64;
        for (index, led) in self.core.pixels_mut().iter_mut().enumerate() {
            let behind = (head - index as i64) * step;
            if (0..tail as i64).contains(&behind) {
                *led = lerp_color(color, background, behind as f64 / tail);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, Rgb};
    use crate::param::EffectParams;

    fn comet(led_count: usize, bounce: bool) -> CometEffect {
        let mut effect = CometEffect::new();
        let params = EffectParams::new()
            .with("tailLength", 5.0)
            .with("bounce", bounce)
            .with("speed", 2.0);
        effect.init(led_count, Some(&params));
        effect
    }

    #[test]
    fn test_bounces_at_far_end() {
        let mut effect = comet(10, true);
        effect.set_head(9.0, 1.0);

        let pixels = effect.tick(0, 33.3).to_vec();
        assert_eq!(effect.position(), 9.0);
        assert_eq!(effect.direction(), -1.0);

        assert_eq!(pixels[9], Rgb::new(255, 0, 100));
        assert_eq!(pixels[8], BLACK);
    }

    #[test]
    fn test_bounces_at_near_end() {
        let mut effect = comet(10, true);
        effect.set_head(1.0, -1.0);

        effect.tick(0, 33.3);
        assert_eq!(effect.position(), 0.0);
        assert_eq!(effect.direction(), 1.0);
    }

    #[test]
    fn test_wraps_without_bounce() {
        let mut effect = comet(10, false);
        effect.set_head(14.0, 1.0);

        effect.tick(0, 33.3);
        assert_eq!(effect.position(), -5.0);
        assert_eq!(effect.direction(), 1.0);
    }

    #[test]
    fn test_tail_fades_to_background() {
        let mut effect = comet(10, true);

        let pixels = effect.tick(0, 33.3).to_vec();
        // head moved to 2, tail runs back towards 0 and off the strip
        assert_eq!(pixels[2], Rgb::new(255, 0, 100));
        assert_eq!(pixels[1], Rgb::new(204, 0, 80));
        assert_eq!(pixels[0], Rgb::new(153, 0, 60));
        assert!(pixels[3..].iter().all(|p| *p == BLACK));
    }
}
