//! The playback state machine.
//!
//! `PlaybackController` owns the playlist, the media backend and the
//! metadata worker, and turns user commands and media events into playlist
//! position changes. Everything runs on the caller's thread; the only
//! asynchronous piece is tag extraction, whose results are applied through
//! [`PlaybackController::poll_metadata`].

use std::time::Duration;

use rand::Rng;

use crate::library::{ARTIST_LOADING, Track, TrackId};
use crate::metadata::{MetadataEvent, MetadataWorker};
use crate::playlist::PlaylistStore;
use crate::preferences::Preferences;

use super::media::MediaElement;
use super::types::{PlaybackError, PlaybackState, RepeatMode};

pub struct PlaybackController<M: MediaElement> {
    playlist: PlaylistStore,
    media: M,
    metadata: MetadataWorker,
    prefs: Preferences,
    state: PlaybackState,
    repeat: RepeatMode,
    shuffle: bool,
    volume: f32,
    muted: bool,
    last_error: Option<String>,
}

impl<M: MediaElement> PlaybackController<M> {
    /// Build a controller with the volume restored from `prefs`
    /// (`default_volume` when nothing was persisted yet).
    pub fn new(
        mut media: M,
        metadata: MetadataWorker,
        prefs: Preferences,
        default_volume: f32,
    ) -> Self {
        let volume = prefs.load_volume(default_volume);
        media.set_volume(volume);

        Self {
            playlist: PlaylistStore::new(),
            media,
            metadata,
            prefs,
            state: PlaybackState::Stopped,
            repeat: RepeatMode::Off,
            shuffle: false,
            volume,
            muted: false,
            last_error: None,
        }
    }

    pub fn playlist(&self) -> &PlaylistStore {
        &self.playlist
    }

    pub fn current_index(&self) -> Option<usize> {
        self.playlist.current_index()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.current_track()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    pub fn shuffle_enabled(&self) -> bool {
        self.shuffle
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level actually sent to the backend.
    fn output_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    pub fn elapsed(&self) -> Duration {
        if self.state == PlaybackState::Stopped {
            Duration::ZERO
        } else {
            self.media.position()
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        if self.state == PlaybackState::Stopped {
            None
        } else {
            self.media.duration()
        }
    }

    /// Most recent playback failure, for display.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn media(&self) -> &M {
        &self.media
    }

    #[cfg(test)]
    pub(crate) fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    pub fn set_shuffle(&mut self, enabled: bool) {
        self.shuffle = enabled;
    }

    fn report(&mut self, err: PlaybackError) {
        log::error!("playback error: {err}");
        self.last_error = Some(err.to_string());
    }

    /// Add tracks to the end of the playlist; playback starts at the first
    /// track when the playlist was empty.
    pub fn append(&mut self, tracks: Vec<Track>) {
        let count = tracks.len();
        let was_empty = self.playlist.append(tracks);
        log::info!("added {count} tracks ({} total)", self.playlist.len());
        if was_empty && !self.playlist.is_empty() {
            self.play_track(0);
        }
    }

    /// Load and start the track at `index`. Out-of-range indices are ignored.
    ///
    /// A source the backend refuses is reported and left alone: the player
    /// does not skip ahead on its own.
    pub fn play_track(&mut self, index: usize) {
        let Some(track) = self.playlist.get(index) else {
            log::debug!("play_track({index}) ignored: {} tracks", self.playlist.len());
            return;
        };
        let (id, path) = (track.id, track.path.clone());
        // Tags are read once per entry; replays reuse what is already there.
        let needs_tags = track.artist == ARTIST_LOADING;
        self.playlist.set_current(index);
        if needs_tags {
            self.metadata.request(id, path.clone());
        }

        if let Err(e) = self.media.load(&path) {
            self.state = PlaybackState::Stopped;
            self.report(e);
            return;
        }

        match self.media.play() {
            Ok(()) => {
                self.state = PlaybackState::Playing;
                self.last_error = None;
                log::debug!("playing #{index}: {}", path.display());
            }
            Err(e) => {
                self.state = PlaybackState::Paused;
                self.report(e);
            }
        }
    }

    /// `selectTrack` from the command surface.
    pub fn select_track(&mut self, index: usize) {
        self.play_track(index);
    }

    pub fn toggle_play_pause(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        match self.state {
            PlaybackState::Playing => {
                self.media.pause();
                self.state = PlaybackState::Paused;
            }
            PlaybackState::Paused => match self.media.play() {
                Ok(()) => self.state = PlaybackState::Playing,
                Err(e) => self.report(e),
            },
            PlaybackState::Stopped => {
                let index = self.playlist.current_index().unwrap_or(0);
                self.play_track(index);
            }
        }
    }

    /// Unload the current source. The playlist position is kept.
    pub fn stop(&mut self) {
        self.media.unload();
        self.state = PlaybackState::Stopped;
    }

    pub fn next_track(&mut self) {
        let len = self.playlist.len();
        let Some(current) = self.playlist.current_index() else {
            return;
        };

        match (self.repeat, self.shuffle) {
            (RepeatMode::One, _) => self.play_track(current),
            (_, true) => {
                let index = rand::rng().random_range(0..len);
                self.play_track(index);
            }
            (RepeatMode::Off, false) => {
                if current + 1 < len {
                    self.play_track(current + 1);
                } else {
                    self.stop();
                }
            }
            (RepeatMode::All, false) => self.play_track((current + 1) % len),
        }
    }

    /// Step back one track. `All` wraps to the last track; `Off` restarts
    /// the first track instead of wrapping. Shuffle does not apply here.
    pub fn prev_track(&mut self) {
        let len = self.playlist.len();
        let Some(current) = self.playlist.current_index() else {
            return;
        };

        let index = match self.repeat {
            RepeatMode::One => current,
            RepeatMode::All if current == 0 => len - 1,
            RepeatMode::Off if current == 0 => 0,
            _ => current - 1,
        };
        self.play_track(index);
    }

    /// The media backend finished the current source.
    pub fn on_track_ended(&mut self) {
        let len = self.playlist.len();
        let at_last = self.playlist.current_index() == Some(len.saturating_sub(1));

        if self.repeat == RepeatMode::Off && !self.shuffle && at_last {
            log::debug!("end of playlist");
            self.stop();
            return;
        }
        self.next_track();
    }

    /// Check the backend for end of stream; call once per UI tick.
    pub fn tick(&mut self) {
        if self.state == PlaybackState::Playing && self.media.has_ended() {
            self.on_track_ended();
        }
    }

    pub fn toggle_repeat(&mut self) {
        self.repeat = self.repeat.cycled();
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
    }

    /// Reorder the whole playlist at random and restart from its first track.
    pub fn shuffle_playlist(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        self.playlist.shuffle(&mut rand::rng());
        self.play_track(0);
    }

    /// Clamp to `0.0..=1.0`, apply and persist. NaN is ignored.
    ///
    /// While muted the new level is remembered but the output stays silent.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.volume = volume;
        self.media.set_volume(self.output_volume());
        if let Err(e) = self.prefs.save_volume(volume) {
            log::warn!("could not persist volume: {e}");
        }
    }

    /// Silence or restore the output. The stored volume is left alone.
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.media.set_volume(self.output_volume());
    }

    /// Jump to `fraction` of the current track. No-op until the duration is known.
    pub fn seek(&mut self, fraction: f64) {
        if self.state == PlaybackState::Stopped || fraction.is_nan() {
            return;
        }
        let Some(total) = self.media.duration() else {
            return;
        };
        let target = total.mul_f64(fraction.clamp(0.0, 1.0));
        if let Err(e) = self.media.seek(target) {
            self.report(e);
        }
    }

    /// Drop every track and release the loaded source.
    pub fn clear(&mut self) {
        self.media.unload();
        self.playlist.clear();
        self.state = PlaybackState::Stopped;
        self.last_error = None;
    }

    /// Apply one extraction result.
    ///
    /// Results for tracks that left the playlist are dropped. Returns `true`
    /// when the now-playing track was updated.
    pub fn apply_metadata(&mut self, event: MetadataEvent) -> bool {
        let MetadataEvent { id, result } = event;
        let meta = result.unwrap_or_default();

        if !self.playlist.update_track_metadata(id, meta) {
            log::debug!("dropping tags for removed track {id:?}");
            return false;
        }
        self.is_current(id)
    }

    fn is_current(&self, id: TrackId) -> bool {
        self.playlist.current_track().is_some_and(|t| t.id == id)
    }

    /// Apply every finished extraction. Returns `true` when the now-playing
    /// track was among them.
    pub fn poll_metadata(&mut self) -> bool {
        let mut changed = false;
        while let Some(event) = self.metadata.try_recv() {
            changed |= self.apply_metadata(event);
        }
        changed
    }

    /// Release the media source and stop the metadata worker.
    pub fn shutdown(&mut self) {
        self.media.unload();
        self.state = PlaybackState::Stopped;
        self.metadata.shutdown();
    }
}
