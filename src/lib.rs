pub mod color;
pub mod config;
pub mod effect;
pub mod engine;
pub mod error;
pub mod frame_scheduler;
pub mod manager;
pub mod math8;
pub mod output;
pub mod param;
pub mod render_loop;
pub mod state;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use color::{BLACK, Rgb, RgbTuple};
pub use config::DaemonConfig;
pub use effect::{BUILTIN_EFFECTS, Effect, EffectCore, EffectInfo, SharedEffect};
pub use engine::Engine;
pub use error::{Error, LoadError, OutputError, Result, StateError};
pub use frame_scheduler::{FpsCounter, FrameScheduler};
pub use manager::{EffectLoader, EffectManager};
pub use output::{ColorOrder, MockDriver, OutputDriver, OutputSink, StripConfig};
pub use param::{EffectParams, ParamSchema, ParamValue};
pub use render_loop::RenderLoop;
pub use state::{LedState, RgbColor, Scene, StateStore};

pub use embassy_time::{Duration, Instant};

/// Lock a mutex, recovering the data if a previous holder panicked
///
/// Effect ticks run under `catch_unwind`, so a poisoned lock only means a
/// tick was cut short; the data is still usable.
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
