//! TOML-based application configuration.
//!
//! Stores user preferences for:
//! - Alarm playback (external player, arguments, sounds directory)
//! - Play screen timing
//!
//! Configuration is stored at `<data dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Alarm and preview playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// When false, alarms are logged but never played.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// External player program.
    #[serde(default = "default_player")]
    pub player: String,
    /// Arguments passed before the clip path.
    #[serde(default = "default_player_args")]
    pub args: Vec<String>,
    /// Extra arguments for looping playback (the alarm).
    #[serde(default = "default_loop_args")]
    pub loop_args: Vec<String>,
    /// Directory holding `sound1.mp3`..`sound3.mp3`. Defaults to
    /// `<data dir>/sounds`.
    #[serde(default)]
    pub sounds_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayConfig {
    /// Countdown tick period in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub play: PlayConfig,
}

fn default_true() -> bool {
    true
}
fn default_player() -> String {
    "mpv".into()
}
fn default_player_args() -> Vec<String> {
    vec!["--no-video".into(), "--really-quiet".into()]
}
fn default_loop_args() -> Vec<String> {
    vec!["--loop=inf".into()]
}
fn default_tick_ms() -> u64 {
    1000
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            player: default_player(),
            args: default_player_args(),
            loop_args: default_loop_args(),
            sounds_dir: None,
        }
    }
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("config.toml"),
                message: e.to_string(),
            })
    }

    /// Load from the data directory, writing defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: err.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| failed(e.to_string()))
    }

    /// Sounds directory with the default applied.
    pub fn sounds_dir(&self) -> PathBuf {
        self.audio.sounds_dir.clone().unwrap_or_else(|| {
            data_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join("sounds")
        })
    }

    /// Get a config value as string by dot-separated key (`audio.player`).
    pub fn get(&self, key: &str) -> Option<String> {
        let tree = serde_json::to_value(self).ok()?;
        let value = key
            .split('.')
            .try_fold(&tree, |node, part| node.get(part))?;
        match value {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key, parsed according to the type the
    /// key currently holds. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys or values that don't parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut tree = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        let (parent_path, leaf) = key.rsplit_once('.').unwrap_or(("", key));
        let mut parent = &mut tree;
        if !parent_path.is_empty() {
            for part in parent_path.split('.') {
                parent = parent
                    .get_mut(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
            }
        }
        let slot = parent
            .as_object_mut()
            .and_then(|obj| obj.get_mut(leaf))
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        *slot = match &*slot {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => serde_json::Value::Number(
                value
                    .parse::<u64>()
                    .map_err(|e| invalid(e.to_string()))?
                    .into(),
            ),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
            }
            // Strings and unset optionals (`sounds_dir`) take the raw text.
            _ => serde_json::Value::String(value.to_string()),
        };

        *self = serde_json::from_value(tree).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }
}
