//! Effect registry and activation
//!
//! [`EffectManager`] owns one instance of every registered effect and tracks
//! which one is active. Built-ins come from [`BUILTIN_EFFECTS`]; further
//! effects can be installed at runtime through an [`EffectLoader`].

use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;

use crate::{
    color::Rgb,
    effect::{BUILTIN_EFFECTS, Effect, EffectInfo, SharedEffect, share},
    error::LoadError,
    frame_scheduler::DEFAULT_FPS,
    lock,
    param::EffectParams,
};

/// Name reported when no effect is active
pub const NO_EFFECT: &str = "none";

/// Turns externally supplied source into an effect
///
/// How the source is compiled or interpreted is up to the implementation.
pub trait EffectLoader {
    fn load(&self, source: &str) -> Result<Box<dyn Effect>, LoadError>;
}

/// Effect metadata together with its origin
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectWithSource {
    #[serde(flatten)]
    pub info: EffectInfo,
    pub source: Option<String>,
    pub is_builtin: bool,
}

struct Entry {
    info: EffectInfo,
    effect: SharedEffect,
    source: Option<String>,
}

impl Entry {
    fn is_builtin(&self) -> bool {
        self.source.is_none()
    }
}

pub struct EffectManager {
    led_count: usize,
    entries: Vec<Entry>,
    active: Option<SharedEffect>,
    /// Shared base color, re-applied to every activated effect
    color: Option<Rgb>,
}

impl EffectManager {
    /// Manager with every built-in effect registered and none active
    pub fn new(led_count: usize) -> Self {
        let entries = BUILTIN_EFFECTS
            .iter()
            .map(|factory| {
                let effect = factory();
                Entry {
                    info: effect.info(),
                    effect: share(effect),
                    source: None,
                }
            })
            .collect::<Vec<_>>();
        log::info!("effects: {} built-in effects registered", entries.len());

        Self {
            led_count,
            entries,
            active: None,
            color: None,
        }
    }

    pub const fn led_count(&self) -> usize {
        self.led_count
    }

    fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.info.name == name)
    }

    /// Metadata of every registered effect, in registration order
    pub fn list_effects(&self) -> Vec<EffectInfo> {
        self.entries.iter().map(|entry| entry.info.clone()).collect()
    }

    pub fn effects_with_source(&self) -> Vec<EffectWithSource> {
        self.entries
            .iter()
            .map(|entry| EffectWithSource {
                info: entry.info.clone(),
                source: entry.source.clone(),
                is_builtin: entry.is_builtin(),
            })
            .collect()
    }

    pub fn get_effect(&self, name: &str) -> Option<SharedEffect> {
        self.entry(name).map(|entry| entry.effect.clone())
    }

    /// Activate `name`, initialized with `params` restricted to its schema
    ///
    /// Returns `false` and keeps the active effect when `name` is unknown.
    pub fn set_effect(&mut self, name: &str, params: Option<&EffectParams>) -> bool {
        let Some(entry) = self.entry(name) else {
            log::warn!("effects: unknown effect {name}");
            return false;
        };
        let next = entry.effect.clone();
        let params = params.map(|params| params.sanitized(&entry.info.params));

        if let Some(previous) = self.active.take() {
            lock(&previous).dispose();
        }
        {
            let mut effect = lock(&next);
            effect.init(self.led_count, params.as_ref());
            if let Some(color) = self.color {
                effect.set_color(color);
            }
        }
        self.active = Some(next);

        log::info!("effects: activated {name}");
        true
    }

    /// Merge `params` into the active effect. No-op when idle.
    pub fn set_params(&self, params: &EffectParams) {
        if let Some(active) = &self.active {
            let mut effect = lock(active);
            let sanitized = params.sanitized(&effect.info().params);
            effect.set_params(&sanitized);
        }
    }

    /// Remember the shared base color and hand it to the active effect
    pub fn set_color(&mut self, color: Rgb) {
        self.color = Some(color);
        if let Some(active) = &self.active {
            lock(active).set_color(color);
        }
    }

    /// Keep only the entries of `params` declared by `name`'s schema
    ///
    /// Unknown effects sanitize to an empty set.
    pub fn sanitize_params(&self, name: &str, params: &EffectParams) -> EffectParams {
        self.entry(name)
            .map(|entry| params.sanitized(&entry.info.params))
            .unwrap_or_default()
    }

    /// Every parameter of `name` set to its declared default
    pub fn default_params(&self, name: &str) -> EffectParams {
        self.entry(name)
            .map(|entry| EffectParams::defaults(&entry.info.params))
            .unwrap_or_default()
    }

    /// Base color set through [`EffectManager::set_color`], if any
    pub const fn color(&self) -> Option<Rgb> {
        self.color
    }

    pub fn current(&self) -> Option<SharedEffect> {
        self.active.clone()
    }

    /// Name of the active effect, [`NO_EFFECT`] when idle
    pub fn current_name(&self) -> String {
        self.active.as_ref().map_or_else(
            || NO_EFFECT.to_owned(),
            |active| lock(active).info().name.into_owned(),
        )
    }

    /// Load, validate and register an external effect
    ///
    /// The effect must report a name, must not shadow a built-in and must
    /// render a full frame without panicking. An installed effect with the
    /// same name is replaced; if it is active, it stays active until the
    /// next `set_effect`. On error nothing changes.
    pub fn install(
        &mut self,
        source: &str,
        loader: &dyn EffectLoader,
    ) -> Result<EffectWithSource, LoadError> {
        let mut effect = loader.load(source)?;
        let info = effect.info();
        if info.name.trim().is_empty() {
            return Err(LoadError::MissingName);
        }

        let existing = self.entries.iter().position(|entry| entry.info.name == info.name);
        if let Some(index) = existing {
            if self.entries[index].is_builtin() {
                return Err(LoadError::Builtin(info.name.into_owned()));
            }
        }

        let led_count = self.led_count;
        let delta_ms = 1000.0 / f64::from(DEFAULT_FPS);
        let trial = panic::catch_unwind(AssertUnwindSafe(|| {
            effect.init(led_count, None);
            let len = effect.tick(0, delta_ms).len();
            effect.dispose();
            len
        }));
        if !matches!(trial, Ok(len) if len == led_count) {
            return Err(LoadError::MissingTick(info.name.into_owned()));
        }

        let entry = Entry {
            info: info.clone(),
            effect: share(effect),
            source: Some(source.to_owned()),
        };
        match existing {
            Some(index) => self.entries[index] = entry,
            None => self.entries.push(entry),
        }
        log::info!("effects: installed {}", info.name);

        Ok(EffectWithSource {
            info,
            source: Some(source.to_owned()),
            is_builtin: false,
        })
    }
}
