//! Tag extraction types shared by the extractor and the worker.

use std::path::Path;

use thiserror::Error;

use crate::library::{Picture, TrackId};

/// Tag fields read from a file. Every field is optional; an all-`None` value
/// is what an untagged file yields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub picture: Option<Picture>,
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to read tags: {0}")]
    Read(#[from] lofty::error::LoftyError),

    #[error("failed to open file: {0}")]
    Io(#[from] std::io::Error),
}

/// Completion of one extraction request.
#[derive(Debug)]
pub struct MetadataEvent {
    pub id: TrackId,
    pub result: Result<TrackMetadata, MetadataError>,
}

/// Something that can read tags from an audio file.
pub trait MetadataExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<TrackMetadata, MetadataError>;
}
