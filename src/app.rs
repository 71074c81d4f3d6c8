//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the playback controller
//! together with the cursor and popup state of the terminal front-end.

mod model;

pub use model::*;
