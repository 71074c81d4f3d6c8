//! In-memory playlist ownership.
//!
//! `PlaylistStore` is the only owner of the track list; the playback
//! controller moves its position and the UI reads it.

mod store;

pub use store::PlaylistStore;
