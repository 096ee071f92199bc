//! Persisted light state and scenes
//!
//! [`StateStore`] keeps the current [`LedState`] and the saved [`Scene`]s in
//! memory and hands every change to a [`DebouncedWriter`], so bursts of
//! updates end up as a single write.

mod persistence;

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

pub use persistence::{DebouncedWriter, JsonFileStorage, StateStorage};
use crate::{
    color::Rgb,
    error::Result,
    param::EffectParams,
};

/// Effect selected when nothing else is known
pub const DEFAULT_EFFECT: &str = "solid";

/// Accept any JSON number for an 8-bit field, rounding and clamping it
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamped_u8<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(libm::round(value).clamp(0.0, 255.0) as u8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbColor {
    #[serde(deserialize_with = "clamped_u8")]
    pub r: u8,
    #[serde(deserialize_with = "clamped_u8")]
    pub g: u8,
    #[serde(deserialize_with = "clamped_u8")]
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for RgbColor {
    fn default() -> Self {
        Self::new(255, 0, 100)
    }
}

impl From<RgbColor> for Rgb {
    fn from(color: RgbColor) -> Self {
        Rgb::new(color.r, color.g, color.b)
    }
}

impl From<Rgb> for RgbColor {
    fn from(color: Rgb) -> Self {
        Self::new(color.r, color.g, color.b)
    }
}

/// Light state as persisted and reported to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LedState {
    pub power: bool,
    #[serde(deserialize_with = "clamped_u8")]
    pub brightness: u8,
    pub color: RgbColor,
    pub effect: String,
    pub effect_params: EffectParams,
}

impl Default for LedState {
    fn default() -> Self {
        Self {
            power: false,
            brightness: 255,
            color: RgbColor::default(),
            effect: DEFAULT_EFFECT.into(),
            effect_params: EffectParams::new(),
        }
    }
}

/// Named snapshot of color, brightness and effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: RgbColor,
    #[serde(default = "full_brightness", deserialize_with = "clamped_u8")]
    pub brightness: u8,
    #[serde(default = "default_effect")]
    pub effect: String,
    #[serde(default)]
    pub effect_params: EffectParams,
}

const fn full_brightness() -> u8 {
    255
}

fn default_effect() -> String {
    DEFAULT_EFFECT.into()
}

/// On-disk document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedData {
    pub state: LedState,
    pub scenes: Vec<Scene>,
}

/// Random 16 hex digit identifier
fn scene_id() -> String {
    format!("{:016x}", fastrand::u64(..))
}

pub struct StateStore {
    data: PersistedData,
    writer: Option<DebouncedWriter>,
}

impl StateStore {
    /// Store that never touches the disk
    pub fn in_memory() -> Self {
        Self {
            data: PersistedData::default(),
            writer: None,
        }
    }

    /// Load persisted data and start the debounced writer
    ///
    /// Unreadable or missing data leaves the defaults in place.
    pub fn open(storage: Box<dyn StateStorage>, debounce: Duration) -> Result<Self> {
        let data = match storage.load() {
            Ok(Some(data)) => {
                log::info!("state: loaded from disk");
                data
            }
            Ok(None) => {
                log::info!("state: no saved state, using defaults");
                PersistedData::default()
            }
            Err(err) => {
                log::warn!("state: failed to load, using defaults: {err}");
                PersistedData::default()
            }
        };

        Ok(Self {
            data,
            writer: Some(DebouncedWriter::spawn(storage, debounce)?),
        })
    }

    pub const fn state(&self) -> &LedState {
        &self.data.state
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.data.scenes
    }

    pub const fn data(&self) -> &PersistedData {
        &self.data
    }

    fn changed(&self) {
        if let Some(writer) = &self.writer {
            writer.schedule(self.data.clone());
        }
    }

    pub fn set_power(&mut self, on: bool) {
        self.data.state.power = on;
        self.changed();
    }

    pub fn set_brightness(&mut self, value: i64) {
        self.data.state.brightness = u8::try_from(value.clamp(0, 255)).unwrap_or(u8::MAX);
        self.changed();
    }

    pub fn set_color(&mut self, color: RgbColor) {
        self.data.state.color = color;
        self.changed();
    }

    /// Select an effect; `params`, when given, replace the stored ones
    pub fn set_effect(&mut self, name: &str, params: Option<&EffectParams>) {
        self.data.state.effect = name.to_owned();
        if let Some(params) = params {
            self.data.state.effect_params = params.clone();
        }
        self.changed();
    }

    pub fn set_effect_params(&mut self, params: &EffectParams) {
        self.data.state.effect_params = params.clone();
        self.changed();
    }

    /// Snapshot the current state under `name`
    ///
    /// A scene with the same name is replaced and keeps its id.
    pub fn save_scene(&mut self, name: &str) -> Scene {
        let state = &self.data.state;
        let mut scene = Scene {
            id: String::new(),
            name: name.to_owned(),
            color: state.color,
            brightness: state.brightness,
            effect: state.effect.clone(),
            effect_params: state.effect_params.clone(),
        };

        match self.data.scenes.iter_mut().find(|s| s.name == name) {
            Some(existing) => {
                scene.id = existing.id.clone();
                *existing = scene.clone();
            }
            None => {
                scene.id = scene_id();
                self.data.scenes.push(scene.clone());
            }
        }
        self.changed();
        scene
    }

    pub fn delete_scene(&mut self, id: &str) -> bool {
        let Some(index) = self.data.scenes.iter().position(|s| s.id == id) else {
            return false;
        };
        self.data.scenes.remove(index);
        self.changed();
        true
    }

    /// Copy a scene into the current state; power is left as is
    pub fn apply_scene(&mut self, id: &str) -> Option<Scene> {
        let scene = self.data.scenes.iter().find(|s| s.id == id)?.clone();
        let state = &mut self.data.state;
        state.color = scene.color;
        state.brightness = scene.brightness;
        state.effect.clone_from(&scene.effect);
        state.effect_params = scene.effect_params.clone();
        self.changed();
        Some(scene)
    }

    /// Write pending changes now
    pub fn flush(&self) {
        if let Some(writer) = &self.writer {
            writer.flush();
        }
    }
}
