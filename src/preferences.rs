//! Durable per-user preferences. Only the last volume is remembered.
//!
//! Stored as TOML at `$HIFI_STATE_PATH`, or `$XDG_STATE_HOME/hifi/state.toml`
//! (`~/.local/state/hifi/state.toml` when `XDG_STATE_HOME` is not set).

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("preferences I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode preferences: {0}")]
    Encode(#[from] toml::ser::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredPreferences {
    volume: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct Preferences {
    path: Option<PathBuf>,
}

impl Preferences {
    /// Preferences stored in the platform default location.
    pub fn from_default_location() -> Self {
        Self {
            path: resolve_state_path(),
        }
    }

    /// Preferences stored in an explicit file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn read(&self) -> StoredPreferences {
        let Some(path) = &self.path else {
            return StoredPreferences::default();
        };
        let Ok(raw) = fs::read_to_string(path) else {
            return StoredPreferences::default();
        };
        toml::from_str(&raw).unwrap_or_else(|e| {
            log::warn!("ignoring unreadable preferences at {}: {e}", path.display());
            StoredPreferences::default()
        })
    }

    /// Last persisted volume, or `default` when nothing usable was stored.
    pub fn load_volume(&self, default: f32) -> f32 {
        match self.read().volume {
            Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
            _ => default,
        }
    }

    pub fn save_volume(&self, volume: f32) -> Result<(), PreferencesError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut stored = self.read();
        stored.volume = Some(volume);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string(&stored)?)?;
        Ok(())
    }
}

/// Resolve the state file from `HIFI_STATE_PATH` or XDG defaults.
pub fn resolve_state_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("HIFI_STATE_PATH") {
        return Some(PathBuf::from(p));
    }

    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("hifi").join("state.toml"))
}
