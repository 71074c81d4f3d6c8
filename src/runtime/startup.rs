use log::LevelFilter;

use crate::config;
use crate::player::{MediaElement, PlaybackController};

/// Install the `log` backend. Output goes to stderr, so the level defaults to
/// `off` while the TUI owns the terminal.
pub fn init_logging(settings: &config::Settings) {
    let level = settings.log_level().unwrap_or(LevelFilter::Off);
    let mut clog = colog::default_builder();
    clog.filter(None, level);
    if clog.try_init().is_err() {
        eprintln!("hifi: logger already initialized");
    }
}

pub fn apply_playback_defaults<M: MediaElement>(
    player: &mut PlaybackController<M>,
    settings: &config::Settings,
) {
    player.set_shuffle(settings.playback.shuffle);
    player.set_repeat_mode(settings.playback.repeat_mode.into());
}
