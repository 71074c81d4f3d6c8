use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::library;
use crate::metadata::{LoftyExtractor, MetadataWorker};
use crate::player::{PlaybackController, RodioMedia};
use crate::preferences::Preferences;

mod event_loop;
mod settings;
mod startup;

/// Mount the player, run the terminal UI until the user quits, then tear it down.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    startup::init_logging(&settings);

    let paths: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    let tracks = library::collect(&paths, &settings.library);

    let media = RodioMedia::open_default()?;
    let metadata = MetadataWorker::spawn(Arc::new(LoftyExtractor));
    let prefs = Preferences::from_default_location();
    log::debug!("preferences file: {:?}", prefs.path());

    let mut player =
        PlaybackController::new(media, metadata, prefs, settings.audio.default_volume);
    startup::apply_playback_defaults(&mut player, &settings);
    player.append(tracks);

    let mut app = App::new(player);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(&mut terminal, &settings, &mut app, &mut state)
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.player.shutdown();
    run_result
}
