//! Asynchronous tag extraction for playlist entries.

mod lofty_reader;
mod types;
mod worker;

pub use lofty_reader::LoftyExtractor;
pub use types::*;
pub use worker::MetadataWorker;
