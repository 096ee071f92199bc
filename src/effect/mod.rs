//! Effect system
//!
//! Every animation implements the [`Effect`] trait. Shared bookkeeping (LED
//! count, live parameters, pixel buffer) lives in an [`EffectCore`] owned by
//! each effect; effect-private continuous state (phase accumulators, heat
//! fields, particles) stays in the effect itself and is reset by `init`.

mod aurora;
mod base;
mod breathing;
mod christmas;
mod color_wipe;
mod comet;
mod fire;
mod plasma;
mod rainbow;
mod sparkle;
mod static_color;
mod strobe;
mod theater_chase;

use std::borrow::Cow;
use std::sync::{Arc, Mutex};

use serde::Serialize;

pub use aurora::AuroraEffect;
pub use base::EffectCore;
pub use breathing::BreathingEffect;
pub use christmas::ChristmasEffect;
pub use color_wipe::ColorWipeEffect;
pub use comet::CometEffect;
pub use fire::FireEffect;
pub use plasma::PlasmaEffect;
pub use rainbow::RainbowEffect;
pub use sparkle::SparkleEffect;
pub use static_color::SolidEffect;
pub use strobe::StrobeEffect;
pub use theater_chase::TheaterChaseEffect;

use crate::color::{Rgb, RgbTuple};
use crate::param::{EffectParams, ParamSchema};

/// Default foreground color of the built-in effects
pub(crate) const DEFAULT_COLOR: &[RgbTuple] = &[[255, 0, 100]];

/// Default background color of the built-in effects
pub(crate) const DEFAULT_BACKGROUND: &[RgbTuple] = &[[0, 0, 0]];

/// Static effect metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectInfo {
    pub name: Cow<'static, str>,
    pub label: Cow<'static, str>,
    pub description: Cow<'static, str>,
    pub params: Cow<'static, [ParamSchema]>,
}

impl EffectInfo {
    /// Metadata made of static parts, usable in `const` items
    pub const fn new_static(
        name: &'static str,
        label: &'static str,
        description: &'static str,
        params: &'static [ParamSchema],
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            label: Cow::Borrowed(label),
            description: Cow::Borrowed(description),
            params: Cow::Borrowed(params),
        }
    }
}

pub trait Effect: Send {
    /// Effect metadata. Pure.
    fn info(&self) -> EffectInfo;

    fn core(&self) -> &EffectCore;

    fn core_mut(&mut self) -> &mut EffectCore;

    /// Reset private continuous state
    ///
    /// Called by `init` after the parameters and the pixel buffer are set up,
    /// so implementations may read parameters here.
    fn reset(&mut self) {}

    /// Render a single frame into the core pixel buffer
    ///
    /// Must write every pixel.
    fn render(&mut self, frame: u64, delta_ms: f64);

    /// Allocate the pixel buffer, reset state and populate the parameters:
    /// schema defaults first, then every non-null entry of `params`
    fn init(&mut self, led_count: usize, params: Option<&EffectParams>) {
        self.core_mut().init(led_count, params);
        self.reset();
    }

    /// Merge `params` into the live parameter set, effective next tick
    fn set_params(&mut self, params: &EffectParams) {
        self.core_mut().overlay(params);
    }

    /// Apply a shared base color
    ///
    /// Effects with a `color` parameter take it as their primary color.
    fn set_color(&mut self, color: Rgb) {
        self.core_mut().set_primary_color(color);
    }

    /// Advance by `delta_ms` and return the frame
    fn tick(&mut self, frame: u64, delta_ms: f64) -> &[Rgb] {
        self.render(frame, delta_ms);
        self.core().pixels()
    }

    /// Release resources
    fn dispose(&mut self) {}
}

/// Effect shared between the effect manager and the render loop
pub type SharedEffect = Arc<Mutex<Box<dyn Effect>>>;

/// Wrap an effect for sharing
pub fn share(effect: Box<dyn Effect>) -> SharedEffect {
    Arc::new(Mutex::new(effect))
}

/// Constructor of a registered effect
pub type EffectFactory = fn() -> Box<dyn Effect>;

fn boxed<E: Effect + Default + 'static>() -> Box<dyn Effect> {
    Box::new(E::default())
}

/// Built-in effects in listing order
pub const BUILTIN_EFFECTS: &[EffectFactory] = &[
    boxed::<SolidEffect>,
    boxed::<RainbowEffect>,
    boxed::<BreathingEffect>,
    boxed::<ColorWipeEffect>,
    boxed::<StrobeEffect>,
    boxed::<FireEffect>,
    boxed::<PlasmaEffect>,
    boxed::<TheaterChaseEffect>,
    boxed::<CometEffect>,
    boxed::<SparkleEffect>,
    boxed::<AuroraEffect>,
    boxed::<ChristmasEffect>,
];
