use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    frame_scheduler::DEFAULT_FPS,
    output::StripConfig,
};

/// Top-level daemon configuration
///
/// Every field has a default, so a partial file is enough.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub strip: StripConfig,
    pub animation: AnimationConfig,
    pub state: StateConfig,
}

impl DaemonConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("{}: {err}", path.display())))?;
        Self::from_json(&contents)
            .map_err(|err| Error::Config(format!("{}: {err}", path.display())))
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationConfig {
    pub target_fps: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_FPS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateConfig {
    pub path: PathBuf,
    /// Quiet period after the last change before state is written
    pub save_debounce_ms: u64,
}

impl StateConfig {
    pub const fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./state.json"),
            save_debounce_ms: 1000,
        }
    }
}
