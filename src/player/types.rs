//! Playback-related small types.
//!
//! This module defines the enums shared by the controller, the media
//! backends and the UI (repeat mode, transport state, playback errors).

use std::path::PathBuf;

use thiserror::Error;

use crate::config::RepeatModeSetting;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Stop after the last track.
    #[default]
    Off,
    /// Replay the current track.
    One,
    /// Wrap around to the first track.
    All,
}

impl RepeatMode {
    /// `Off -> One -> All -> Off`.
    pub fn cycled(self) -> Self {
        match self {
            Self::Off => Self::One,
            Self::One => Self::All,
            Self::All => Self::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::One => "ONE",
            Self::All => "ALL",
        }
    }
}

impl From<RepeatModeSetting> for RepeatMode {
    fn from(s: RepeatModeSetting) -> Self {
        match s {
            RepeatModeSetting::Off => Self::Off,
            RepeatModeSetting::One => Self::One,
            RepeatModeSetting::All => Self::All,
        }
    }
}

/// The transport state of the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No source loaded.
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Reasons the media backend refused a request.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no audio output device: {0}")]
    Output(String),

    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode {}: {reason}", path.display())]
    Unsupported { path: PathBuf, reason: String },

    #[error("no source loaded")]
    NothingLoaded,
}
