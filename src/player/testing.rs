//! In-memory `MediaElement` for controller and app tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::media::MediaElement;
use super::types::PlaybackError;

#[derive(Debug, Default)]
pub struct FakeMedia {
    pub loaded: Option<PathBuf>,
    pub loads: Vec<PathBuf>,
    pub unloads: usize,
    pub playing: bool,
    pub position: Duration,
    /// Reported once a source is loaded.
    pub length: Option<Duration>,
    pub volume: f32,
    pub ended: bool,
    pub reject_play: bool,
    pub undecodable: Option<PathBuf>,
    /// Seeks fail as if the file vanished after loading.
    pub fail_seek: bool,
    pub seeks: Vec<Duration>,
}

impl MediaElement for FakeMedia {
    fn load(&mut self, path: &Path) -> Result<(), PlaybackError> {
        self.unload();
        if self.undecodable.as_deref() == Some(path) {
            return Err(PlaybackError::Unsupported {
                path: path.to_path_buf(),
                reason: "unsupported container".to_string(),
            });
        }
        self.loaded = Some(path.to_path_buf());
        self.loads.push(path.to_path_buf());
        self.position = Duration::ZERO;
        self.ended = false;
        Ok(())
    }

    fn unload(&mut self) {
        if self.loaded.take().is_some() {
            self.unloads += 1;
        }
        self.playing = false;
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.loaded.is_none() {
            return Err(PlaybackError::NothingLoaded);
        }
        if self.reject_play {
            return Err(PlaybackError::Output("blocked".to_string()));
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, to: Duration) -> Result<(), PlaybackError> {
        if self.loaded.is_none() {
            return Err(PlaybackError::NothingLoaded);
        }
        if self.fail_seek {
            return Err(PlaybackError::Unsupported {
                path: self.loaded.clone().unwrap_or_default(),
                reason: "file vanished".to_string(),
            });
        }
        self.seeks.push(to);
        self.position = to;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn duration(&self) -> Option<Duration> {
        self.loaded.as_ref().and(self.length)
    }

    fn has_ended(&self) -> bool {
        self.ended
    }
}
