use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::display::{display_name_for, format_badge};

/// Artist shown until tag extraction for the track has completed.
pub const ARTIST_LOADING: &str = "Loading...";
/// Artist shown when the file carries no artist tag or could not be read.
pub const ARTIST_UNKNOWN: &str = "Unknown Artist";

static NEXT_TRACK_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a playlist entry.
///
/// Positions change when the playlist is shuffled or cleared; ids don't.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TrackId(u64);

impl TrackId {
    fn fresh() -> Self {
        Self(NEXT_TRACK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Embedded artwork extracted from a file's tags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Picture {
    pub data: Vec<u8>,
    pub mime_type: String,
}

#[derive(Clone, Debug)]
pub struct Track {
    pub id: TrackId,
    pub path: PathBuf,
    pub display_name: String,
    pub artist: String,
    pub format: String,
    pub picture: Option<Picture>,
}

impl Track {
    /// Build a fresh entry for `path` with placeholder tag values.
    pub fn from_path(path: &Path) -> Self {
        Self {
            id: TrackId::fresh(),
            path: path.to_path_buf(),
            display_name: display_name_for(path),
            artist: ARTIST_LOADING.to_string(),
            format: format_badge(path),
            picture: None,
        }
    }
}
