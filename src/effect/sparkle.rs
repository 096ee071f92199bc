//! Sparkle particle effect
//!
//! Particles spawn at a steady rate, drift under gravity and drag, fade in
//! and out over their lifetime and die. Overlapping particles composite by
//! taking the strongest one per LED.

use heapless::Vec as PoolVec;

use super::{DEFAULT_BACKGROUND, DEFAULT_COLOR, Effect, EffectCore, EffectInfo};
use crate::{
    color::{Rgb, lerp_color, rgb_from_tuple},
    param::ParamSchema,
};

/// Upper bound of live particles; spawns beyond it are dropped
pub const MAX_PARTICLES: usize = 256;

const PARAMS: &[ParamSchema] = &[
    ParamSchema::palette("color", "Colors", DEFAULT_COLOR),
    ParamSchema::color("backgroundColor", "Background Color", DEFAULT_BACKGROUND),
    ParamSchema::number("spawnRate", "Spawn Rate", 15.0, 1.0, 100.0, 1.0)
        .with_description("Particles spawned per second"),
    ParamSchema::number("lifetime", "Lifetime", 1.5, 0.2, 5.0, 0.1)
        .with_description("Particle lifetime in seconds"),
    ParamSchema::number("lifetimeVariation", "Lifetime Variation", 0.5, 0.0, 1.0, 0.1),
    ParamSchema::number("speed", "Speed", 5.0, 0.0, 50.0, 1.0)
        .with_description("Initial speed in LEDs per second"),
    ParamSchema::number("speedVariation", "Speed Variation", 0.5, 0.0, 1.0, 0.1),
    ParamSchema::number("gravity", "Gravity", 0.0, -50.0, 50.0, 1.0)
        .with_description("Acceleration in LEDs per second squared"),
    ParamSchema::number("drag", "Drag", 0.0, 0.0, 5.0, 0.1),
    ParamSchema::number("fadeIn", "Fade In", 0.1, 0.0, 0.5, 0.05)
        .with_description("Fraction of the lifetime spent fading in"),
    ParamSchema::number("fadeOut", "Fade Out", 0.5, 0.0, 1.0, 0.05)
        .with_description("Fraction of the lifetime spent fading out"),
    ParamSchema::number("size", "Size", 1.0, 1.0, 5.0, 1.0).with_description("Particle width in LEDs"),
    ParamSchema::boolean("bounce", "Bounce", false)
        .with_description("Reflect particles at the strip ends"),
    ParamSchema::boolean("wrap", "Wrap", true)
        .with_description("Particles leaving one end enter at the other"),
    ParamSchema::boolean("bidirectional", "Bidirectional", true)
        .with_description("Particles move in both directions"),
];

const INFO: EffectInfo = EffectInfo::new_static(
    "sparkle",
    "Sparkle",
    "Drifting particles that fade in and out",
    PARAMS,
);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in LEDs
    pub position: f64,
    /// Velocity in LEDs per second
    pub velocity: f64,
    /// Remaining lifetime in seconds
    pub lifetime: f64,
    pub max_lifetime: f64,
    pub color: Rgb,
}

impl Particle {
    /// Opacity from the fade-in/fade-out ramps
    pub fn alpha(&self, fade_in: f64, fade_out: f64) -> f64 {
        let progress = 1.0 - self.lifetime / self.max_lifetime;
        if fade_in > 0.0 && progress < fade_in {
            progress / fade_in
        } else if fade_out > 0.0 && progress > 1.0 - fade_out {
            (1.0 - progress) / fade_out
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Boundary {
    Bounce,
    Wrap,
    Free,
}

#[derive(Debug, Clone)]
pub struct SparkleEffect {
    core: EffectCore,
    particles: PoolVec<Particle, MAX_PARTICLES>,
    spawn_accumulator: f64,
    /// Strongest particle alpha per LED, reused every frame
    alpha: Vec<f64>,
    seed: u64,
    rng: fastrand::Rng,
}

impl Default for SparkleEffect {
    fn default() -> Self {
        Self::with_seed(fastrand::u64(..))
    }
}

impl SparkleEffect {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            core: EffectCore::new(PARAMS),
            particles: PoolVec::new(),
            spawn_accumulator: 0.0,
            alpha: Vec::new(),
            seed,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// `1 ± variation`, uniformly distributed
    fn vary(&mut self, variation: f64) -> f64 {
        1.0 - variation + self.rng.f64() * variation * 2.0
    }

    #[allow(clippy::cast_precision_loss)]
    fn spawn(&mut self) {
        let palette = self.core.colors("color");
        if palette.is_empty() {
            return;
        }
        let color = rgb_from_tuple(palette[self.rng.usize(..palette.len())]);

        let lifetime_variation = self.core.number("lifetimeVariation");
        let speed_variation = self.core.number("speedVariation");
        let lifetime = self.core.number("lifetime") * self.vary(lifetime_variation);
        let mut velocity = self.core.number("speed") * self.vary(speed_variation);
        if self.core.boolean("bidirectional") && self.rng.bool() {
            velocity = -velocity;
        }
        let position = self.rng.f64() * self.core.led_count() as f64;

        let particle = Particle {
            position,
            velocity,
            lifetime,
            max_lifetime: lifetime,
            color,
        };
        if self.particles.push(particle).is_err() {
            log::trace!("sparkle: particle pool full, spawn dropped");
        }
    }

    fn boundary(&self) -> Boundary {
        if self.core.boolean("bounce") {
            Boundary::Bounce
        } else if self.core.boolean("wrap") {
            Boundary::Wrap
        } else {
            Boundary::Free
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn update(&mut self, dt: f64) {
        let gravity = self.core.number("gravity");
        let drag_factor = (1.0 - self.core.number("drag").max(0.0) * dt).max(0.0);
        let boundary = self.boundary();
        let len = self.core.led_count() as f64;

        for p in &mut self.particles {
            p.velocity += gravity * dt;
            p.velocity *= drag_factor;
            p.position += p.velocity * dt;

            match boundary {
                Boundary::Bounce => {
                    if p.position < 0.0 {
                        p.position = -p.position;
                        p.velocity = -p.velocity;
                    } else if p.position >= len {
                        p.position = 2.0 * len - p.position - 1.0;
                        p.velocity = -p.velocity;
                    }
                    p.position = p.position.clamp(0.0, (len - 1.0).max(0.0));
                }
                Boundary::Wrap if len > 0.0 => p.position = p.position.rem_euclid(len),
                Boundary::Wrap | Boundary::Free => {}
            }

            p.lifetime -= dt;
        }

        // Spawn order decides ties in the compositing pass
        self.particles.retain(|p| p.lifetime > 0.0);
    }
}

impl Effect for SparkleEffect {
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
        self.particles.clear();
        self.spawn_accumulator = 0.0;
        self.alpha.clear();
        self.alpha.resize(self.core.led_count(), 0.0);
        self.rng.seed(self.seed);
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn render(&mut self, _frame: u64, delta_ms: f64) {
        let dt = delta_ms.max(0.0) / 1000.0;

        self.spawn_accumulator += self.core.number("spawnRate").max(0.0) * dt;
        if self.spawn_accumulator >= 1.0 {
            let due = libm::floor(self.spawn_accumulator);
            self.spawn_accumulator -= due;
            let free = MAX_PARTICLES - self.particles.len();
            for _ in 0..(due as usize).min(free) {
                self.spawn();
            }
        }

        self.update(dt);

        let background = self.core.color("backgroundColor");
        let fade_in = self.core.number("fadeIn");
        let fade_out = self.core.number("fadeOut");
        let len = self.core.led_count() as i64;
        let size = (libm::floor(self.core.number("size")) as i64).clamp(1, len.max(1));
        let half = size / 2;
        let wrap = matches!(self.boundary(), Boundary::Wrap);

        self.alpha.fill(0.0);
        self.core.fill(background);
        let pixels = self.core.pixels_mut();

        for p in &self.particles {
            let alpha = p.alpha(fade_in, fade_out);
            let center = libm::floor(p.position) as i64;

            for offset in -half..=half {
                let mut index = center + offset;
                if wrap && len > 0 {
                    index = index.rem_euclid(len);
                }
                if !(0..len).contains(&index) {
                    continue;
                }
                let falloff = if size > 1 {
                    1.0 - offset.abs() as f64 / (half + 1) as f64
                } else {
                    1.0
                };
                let strength = alpha * falloff;
                let index = index as usize;
                if strength > self.alpha[index] {
                    self.alpha[index] = strength;
                    pixels[index] = lerp_color(background, p.color, strength);
                }
            }
        }
    }
}
