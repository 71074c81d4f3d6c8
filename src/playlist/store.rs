use rand::Rng;
use rand::seq::SliceRandom;

use crate::library::{ARTIST_UNKNOWN, Track, TrackId};
use crate::metadata::TrackMetadata;

/// Ordered list of playlist entries plus the current-position pointer.
///
/// `current` is `Some(i)` with `i < tracks.len()` whenever the list is
/// non-empty and `None` when it is empty.
#[derive(Debug, Default)]
pub struct PlaylistStore {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl PlaylistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    pub fn position_of(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// Add `tracks` at the end. Returns whether the store was empty before the call.
    ///
    /// The current position only moves when the store was empty; it then
    /// points at the first new entry.
    pub fn append(&mut self, tracks: Vec<Track>) -> bool {
        let was_empty = self.tracks.is_empty();
        self.tracks.extend(tracks);
        if was_empty && !self.tracks.is_empty() {
            self.current = Some(0);
        }
        was_empty
    }

    /// Point at `index`. Out-of-range indices leave the store untouched.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.current = Some(index);
            true
        } else {
            false
        }
    }

    /// Drop every entry (and the artwork they hold) and reset the position.
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.current = None;
    }

    /// Merge extracted tags into the entry identified by `id`.
    ///
    /// Returns `false` without touching anything when the entry is no longer
    /// in the list. Results are routed by id, not by position, so a shuffle in
    /// between cannot misplace them. Missing artist and artwork fall back to placeholders.
    pub fn update_track_metadata(&mut self, id: TrackId, meta: TrackMetadata) -> bool {
        let Some(track) = self.position_of(id).map(|i| &mut self.tracks[i]) else {
            return false;
        };

        if let Some(title) = meta.title {
            track.display_name = title;
        }
        track.artist = meta.artist.unwrap_or_else(|| ARTIST_UNKNOWN.to_string());
        track.picture = meta.picture;
        true
    }

    /// Uniformly permute all entries in place (Fisher–Yates) and point at the first one.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.tracks.len() <= 1 {
            return;
        }
        self.tracks.shuffle(rng);
        self.current = Some(0);
    }
}
