use std::path::Path;
use std::time::Duration;

/// File name with its last extension stripped (`"01 Intro.mp3"` -> `"01 Intro"`).
pub fn display_name_for(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

/// Upper-cased file extension, or an empty string when the file has none.
pub fn format_badge(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_uppercase)
        .unwrap_or_default()
}

/// Format a `Duration` as `m:ss`, flooring partial seconds.
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
