//! Playback: the controller state machine and the media backends it drives.

mod controller;
mod media;
mod rodio_media;
mod types;

pub use controller::PlaybackController;
pub use media::MediaElement;
pub use rodio_media::RodioMedia;
pub use types::*;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests;
