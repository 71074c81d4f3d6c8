//! Application model: `App`.
//!
//! `App` wraps the playback controller with the bits of state that only
//! matter to the terminal front-end (list cursor, follow mode, popups).

use std::time::Duration;

use crate::player::{MediaElement, PlaybackController};

/// The main application model.
pub struct App<M: MediaElement> {
    pub player: PlaybackController<M>,
    pub selected: usize,
    /// When on, the cursor jumps to whatever track is playing.
    pub follow_playback: bool,
    pub info_window: bool,
}

impl<M: MediaElement> App<M> {
    pub fn new(player: PlaybackController<M>) -> Self {
        Self {
            player,
            selected: 0,
            follow_playback: true,
            info_window: false,
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.player.playlist().is_empty()
    }

    fn len(&self) -> usize {
        self.player.playlist().len()
    }

    pub fn toggle_info_window(&mut self) {
        self.info_window = !self.info_window;
    }

    /// Enable following playback (cursor follows currently playing track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Move the cursor to `idx`, clamped to the playlist.
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx.min(self.len().saturating_sub(1));
    }

    /// Move selection to the next track, wrapping to the first.
    pub fn next(&mut self) {
        if self.has_tracks() {
            self.selected = (self.selected + 1) % self.len();
        }
    }

    /// Move selection to the previous track, wrapping to the last.
    pub fn prev(&mut self) {
        if self.has_tracks() {
            self.selected = self.selected.checked_sub(1).unwrap_or(self.len() - 1);
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.set_selected(usize::MAX);
    }

    /// Play the track under the cursor and let the cursor follow playback again.
    pub fn play_selected(&mut self) {
        if !self.has_tracks() {
            return;
        }
        self.follow_playback_on();
        self.player.select_track(self.selected);
    }

    /// Keep the cursor in range and, in follow mode, on the playing track.
    pub fn sync_cursor(&mut self) {
        if self.follow_playback {
            if let Some(idx) = self.player.current_index() {
                self.selected = idx;
            }
        }
        self.set_selected(self.selected);
    }

    pub fn change_volume(&mut self, delta: f32) {
        let v = self.player.volume() + delta;
        self.player.set_volume(v);
    }

    /// Move the play head by `secs` (negative rewinds).
    pub fn scrub(&mut self, secs: i64) {
        let Some(total) = self.player.duration().filter(|d| !d.is_zero()) else {
            return;
        };
        let elapsed = self.player.elapsed();
        let target = if secs >= 0 {
            elapsed.saturating_add(Duration::from_secs(secs.unsigned_abs()))
        } else {
            elapsed.saturating_sub(Duration::from_secs(secs.unsigned_abs()))
        };
        self.player.seek(target.as_secs_f64() / total.as_secs_f64());
    }

    /// Jump to `tenths`/10 of the current track (`0` = start).
    pub fn seek_tenths(&mut self, tenths: u32) {
        self.player.seek(f64::from(tenths.min(10)) / 10.0);
    }

    pub fn clear(&mut self) {
        self.player.clear();
        self.selected = 0;
        self.info_window = false;
    }
}
