use std::path::Path;
use std::time::Duration;

use super::types::PlaybackError;

/// The single output the controller drives.
///
/// A backend owns at most one loaded source at a time. Loading a new source
/// or calling `unload` releases the previous one.
pub trait MediaElement {
    /// Replace the current source with `path`, paused at its start.
    fn load(&mut self, path: &Path) -> Result<(), PlaybackError>;
    /// Release the current source, if any.
    fn unload(&mut self);
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn seek(&mut self, to: Duration) -> Result<(), PlaybackError>;
    fn set_volume(&mut self, volume: f32);
    /// Elapsed time in the current source.
    fn position(&self) -> Duration;
    /// Total length of the current source, once known.
    fn duration(&self) -> Option<Duration>;
    /// True once a playing source has run out of samples.
    fn has_ended(&self) -> bool;
}
