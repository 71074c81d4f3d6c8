use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::config;
use crate::player::MediaElement;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// Main terminal event loop: applies finished tag reads, advances on end of
/// track, draws, and dispatches key presses. Returns `Ok(())` on quit.
pub fn run<M: MediaElement>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<M>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.player.poll_metadata();
        app.player.tick();
        app.sync_cursor();

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Returns `true` when the user asked to quit.
fn handle_key_event<M: MediaElement>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App<M>,
    state: &mut EventLoopState,
) -> bool {
    // g pending should clear on any other key
    let pending_gg = std::mem::take(&mut state.pending_gg);
    let scrub = settings.controls.scrub_seconds.min(i64::MAX as u64) as i64;
    let step = settings.audio.volume_step;

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('g') => {
            if pending_gg {
                app.follow_playback_off();
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            app.follow_playback_off();
            app.select_last();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.follow_playback_off();
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.follow_playback_off();
            app.prev();
        }
        KeyCode::Enter => app.play_selected(),
        KeyCode::Char(' ') | KeyCode::Char('p') => app.player.toggle_play_pause(),
        KeyCode::Char('l') | KeyCode::Right => {
            app.follow_playback_on();
            app.player.next_track();
        }
        KeyCode::Char('h') | KeyCode::Left => {
            app.follow_playback_on();
            app.player.prev_track();
        }
        KeyCode::Char('L') => app.scrub(scrub),
        KeyCode::Char('H') => app.scrub(-scrub),
        KeyCode::Char(c @ '0'..='9') => app.seek_tenths(c.to_digit(10).unwrap_or(0)),
        KeyCode::Char('+') | KeyCode::Char('=') => app.change_volume(step),
        KeyCode::Char('-') => app.change_volume(-step),
        KeyCode::Char('m') => app.player.toggle_mute(),
        KeyCode::Char('s') => app.player.toggle_shuffle(),
        KeyCode::Char('S') => {
            app.follow_playback_on();
            app.player.shuffle_playlist();
        }
        KeyCode::Char('r') => app.player.toggle_repeat(),
        KeyCode::Char('c') => app.clear(),
        KeyCode::Char('K') => app.toggle_info_window(),
        _ => {}
    }

    false
}
