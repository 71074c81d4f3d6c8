mod app;
mod config;
mod library;
mod metadata;
mod player;
mod playlist;
mod preferences;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
