//! Playlist entries and the helpers that build them from user-selected paths.

mod display;
mod load;
mod model;

pub use display::format_time;
pub use load::collect;
pub use model::*;
