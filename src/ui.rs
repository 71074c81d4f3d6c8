//! UI rendering helpers for the terminal user interface.
//!
//! This module only reads controller state; every change goes through the
//! command methods on `App` / `PlaybackController`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::App;
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::library::{Picture, Track, format_time};
use crate::player::{MediaElement, PlaybackState};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("enter", "play selected");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next");
    // H/L is filled dynamically from config.
    map.insert("0-9", "seek to n/10");
    map.insert("+/-", "volume");
    map.insert("m", "mute");
    map.insert("s", "shuffle");
    map.insert("S", "shuffle list");
    map.insert("r", "repeat");
    map.insert("c", "clear");
    map.insert("K", "info");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "h/l", "H/L", "enter", "space/p", "0-9", "+/-", "m", "gg/G", "s", "S", "r", "c", "K",
        "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(elapsed: Duration, total: Option<Duration>, ui: &UiSettings) -> String {
    let mut parts: Vec<String> = Vec::new();
    for f in &ui.now_playing_time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_time(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_time(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    parts.push(format!("-{}", format_time(t.saturating_sub(elapsed))));
                }
            }
        }
    }
    parts.join(&ui.now_playing_time_separator)
}

fn artwork_text(picture: Option<&Picture>) -> String {
    match picture {
        Some(p) => format!("{} ({} KiB)", p.mime_type, p.data.len().div_ceil(1024)),
        None => "none".to_string(),
    }
}

fn list_line(index: usize, track: &Track, playing: bool) -> String {
    let marker = if playing { "♪" } else { " " };
    format!(
        "{marker} {}. {} - {}",
        index + 1,
        track.display_name,
        track.artist
    )
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw<M: MediaElement>(
    frame: &mut Frame,
    app: &App<M>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let player = &app.player;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" hifi ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Now playing
    let now_playing = match player.current_track() {
        Some(track) => {
            let badge = if track.format.is_empty() {
                String::new()
            } else {
                format!("  [{}]", track.format)
            };
            let state = match player.state() {
                PlaybackState::Playing => "Playing",
                PlaybackState::Paused => "Paused",
                PlaybackState::Stopped => "Stopped",
            };
            let mut lines = vec![
                format!("{}{}", track.display_name, badge),
                format!("Artist: {}", track.artist),
                format!("Art: {}", artwork_text(track.picture.as_ref())),
                format!(
                    "{} • Repeat: {} • Shuffle: {} • Volume: {}% • Mute: {}",
                    state,
                    player.repeat_mode().label(),
                    if player.shuffle_enabled() { "ON" } else { "OFF" },
                    (player.volume() * 100.0).round() as u32,
                    if player.is_muted() { "ON" } else { "OFF" }
                ),
            ];
            if let Some(err) = player.last_error() {
                lines.push(format!("Error: {err}"));
            }
            lines.join("\n")
        }
        None => "No track selected".to_string(),
    };
    frame.render_widget(
        Paragraph::new(now_playing)
            .block(padded(" now playing "))
            .wrap(Wrap { trim: true }),
        chunks[1],
    );

    // Progress
    let elapsed = player.elapsed();
    let total = player.duration();
    let ratio = match total {
        Some(t) if !t.is_zero() => (elapsed.as_secs_f64() / t.as_secs_f64()).clamp(0.0, 1.0),
        _ => 0.0,
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .ratio(ratio)
        .label(now_playing_time_text(elapsed, total, ui_settings));
    frame.render_widget(gauge, chunks[2]);

    // Playlist
    {
        let tracks = player.playlist().tracks();
        let current = player.current_index();

        // Center the selected item when possible by creating a visible window.
        let total = tracks.len();
        let list_height = chunks[3].height.saturating_sub(2) as usize;
        let sel_pos = app.selected.min(total.saturating_sub(1));
        let (start, end) = if total <= list_height || list_height == 0 {
            (0, total)
        } else {
            let half = list_height / 2;
            let mut start = sel_pos.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height)
        };

        let items: Vec<ListItem> = (start..end)
            .map(|i| ListItem::new(list_line(i, &tracks[i], current == Some(i))))
            .collect();

        let title = format!(" playlist ({}) ", total);
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(sel_pos - start));
        }
        frame.render_stateful_widget(list, chunks[3], &mut state);
    }

    // Overlay track info popup (keeps list visible under it)
    if app.info_window {
        let popup_area = centered_rect_sized(72, 9, chunks[3]);
        frame.render_widget(Clear, popup_area);

        let info = match player.playlist().get(app.selected) {
            Some(track) => format!(
                "Title: {}\nArtist: {}\nFormat: {}\nArtwork: {}\nPath: {}",
                track.display_name,
                track.artist,
                if track.format.is_empty() { "-" } else { track.format.as_str() },
                artwork_text(track.picture.as_ref()),
                track.path.display()
            ),
            None => "No track selected".to_string(),
        };
        frame.render_widget(
            Paragraph::new(info)
                .block(padded(" track info (K closes) "))
                .wrap(Wrap { trim: true }),
            popup_area,
        );
    }

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}
