use std::fs::File;
use std::path::Path;

use lofty::file::TaggedFileExt;
use lofty::picture::PictureType;
use lofty::prelude::Accessor;
use lofty::tag::Tag;

use crate::library::Picture;

use super::types::{MetadataError, MetadataExtractor, TrackMetadata};

/// Reads title, artist and cover art with `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyExtractor;

fn non_empty(v: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn cover(tag: &Tag) -> Option<Picture> {
    let pictures = tag.pictures();
    // Prefer front cover, otherwise use first picture
    let picture = pictures
        .iter()
        .find(|p| matches!(p.pic_type(), PictureType::CoverFront))
        .or_else(|| pictures.first())?;

    Some(Picture {
        data: picture.data().to_vec(),
        mime_type: picture
            .mime_type()
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "image/jpeg".to_string()),
    })
}

impl MetadataExtractor for LoftyExtractor {
    fn extract(&self, path: &Path) -> Result<TrackMetadata, MetadataError> {
        let mut file = File::open(path)?;
        let tagged = lofty::read_from(&mut file)?;

        let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
            return Ok(TrackMetadata::default());
        };

        Ok(TrackMetadata {
            title: non_empty(tag.title()),
            artist: non_empty(tag.artist()),
            picture: cover(tag),
        })
    }
}
