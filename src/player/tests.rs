use super::testing::FakeMedia;
use super::*;
use crate::library::{ARTIST_LOADING, ARTIST_UNKNOWN, Track};
use crate::metadata::{MetadataError, MetadataEvent, MetadataExtractor, MetadataWorker, TrackMetadata};
use crate::preferences::Preferences;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tempfile::TempDir;

struct FixedArtist;

impl MetadataExtractor for FixedArtist {
    fn extract(&self, _path: &Path) -> Result<TrackMetadata, MetadataError> {
        Ok(TrackMetadata {
            title: None,
            artist: Some("Worker Artist".to_string()),
            picture: None,
        })
    }
}

/// Counts how often tags are read.
struct CountingExtractor(Arc<AtomicUsize>);

impl MetadataExtractor for CountingExtractor {
    fn extract(&self, _path: &Path) -> Result<TrackMetadata, MetadataError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(TrackMetadata {
            title: None,
            artist: Some("Counted".to_string()),
            picture: None,
        })
    }
}

fn controller(dir: &TempDir) -> PlaybackController<FakeMedia> {
    PlaybackController::new(
        FakeMedia::default(),
        MetadataWorker::spawn(Arc::new(FixedArtist)),
        Preferences::at(dir.path().join("state.toml")),
        0.05,
    )
}

fn tracks(n: usize) -> Vec<Track> {
    (0..n)
        .map(|i| Track::from_path(&PathBuf::from(format!("/music/{i:02}.mp3"))))
        .collect()
}

fn loaded_path(c: &PlaybackController<FakeMedia>, index: usize) -> PathBuf {
    c.playlist().get(index).unwrap().path.clone()
}

#[test]
fn append_three_then_walk_off_the_end() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);

    c.append(tracks(3));
    assert_eq!(c.playlist().len(), 3);
    assert_eq!(c.current_index(), Some(0));
    assert_eq!(c.state(), PlaybackState::Playing);
    assert_eq!(c.media().loaded, Some(loaded_path(&c, 0)));

    c.next_track();
    c.next_track();
    assert_eq!(c.current_index(), Some(2));
    assert_eq!(c.state(), PlaybackState::Playing);

    c.next_track();
    assert_eq!(c.current_index(), Some(2));
    assert_eq!(c.state(), PlaybackState::Stopped);
    assert!(c.media().loaded.is_none());
}

#[test]
fn appending_to_a_non_empty_playlist_does_not_restart_playback() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.append(tracks(2));
    c.play_track(1);
    let loads = c.media().loads.len();

    c.append(tracks(2));
    assert_eq!(c.playlist().len(), 4);
    assert_eq!(c.current_index(), Some(1));
    assert_eq!(c.media().loads.len(), loads);
}

#[test]
fn play_track_sets_index_and_ignores_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);

    c.play_track(0);
    assert_eq!(c.current_index(), None);
    assert_eq!(c.state(), PlaybackState::Stopped);

    c.append(tracks(4));
    for i in 0..4 {
        c.play_track(i);
        assert_eq!(c.current_index(), Some(i));
    }

    let loads = c.media().loads.len();
    c.play_track(4);
    c.play_track(usize::MAX);
    assert_eq!(c.current_index(), Some(3));
    assert_eq!(c.media().loads.len(), loads);
    assert_eq!(c.state(), PlaybackState::Playing);
}

#[test]
fn toggle_repeat_cycles_back_to_off() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    assert_eq!(c.repeat_mode(), RepeatMode::Off);

    c.toggle_repeat();
    assert_eq!(c.repeat_mode(), RepeatMode::One);
    c.toggle_repeat();
    assert_eq!(c.repeat_mode(), RepeatMode::All);
    c.toggle_repeat();
    assert_eq!(c.repeat_mode(), RepeatMode::Off);
}

#[test]
fn toggles_do_not_touch_the_loaded_track() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.append(tracks(3));
    let loads = c.media().loads.len();

    c.toggle_repeat();
    c.toggle_shuffle();
    assert!(c.shuffle_enabled());
    assert_eq!(c.current_index(), Some(0));
    assert_eq!(c.media().loads.len(), loads);
}

#[test]
fn repeat_one_replays_current_from_zero_on_next_and_prev() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.append(tracks(3));
    c.play_track(1);
    c.set_repeat_mode(RepeatMode::One);

    c.media_mut().position = Duration::from_secs(42);
    c.next_track();
    assert_eq!(c.current_index(), Some(1));
    assert_eq!(c.elapsed(), Duration::ZERO);

    c.media_mut().position = Duration::from_secs(17);
    c.prev_track();
    assert_eq!(c.current_index(), Some(1));
    assert_eq!(c.elapsed(), Duration::ZERO);
    assert_eq!(c.state(), PlaybackState::Playing);
}

#[test]
fn next_at_end_stops_without_repeat_and_wraps_with_repeat_all() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.append(tracks(5));

    c.play_track(4);
    c.next_track();
    assert_eq!(c.current_index(), Some(4));
    assert_eq!(c.state(), PlaybackState::Stopped);

    c.play_track(4);
    c.set_repeat_mode(RepeatMode::All);
    c.next_track();
    assert_eq!(c.current_index(), Some(0));
    assert_eq!(c.state(), PlaybackState::Playing);
}

#[test]
fn shuffle_next_picks_random_indices_in_range() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.append(tracks(4));
    c.toggle_shuffle();

    let mut seen = HashSet::new();
    for _ in 0..200 {
        c.next_track();
        let i = c.current_index().unwrap();
        assert!(i < 4);
        seen.insert(i);
    }
    assert_eq!(c.state(), PlaybackState::Playing);
    assert!(seen.len() > 1);
}

#[test]
fn prev_steps_back_and_handles_the_start_per_mode() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.append(tracks(3));

    c.play_track(2);
    c.prev_track();
    assert_eq!(c.current_index(), Some(1));

    c.play_track(0);
    c.prev_track();
    assert_eq!(c.current_index(), Some(0));
    assert_eq!(c.state(), PlaybackState::Playing);

    c.set_repeat_mode(RepeatMode::All);
    c.prev_track();
    assert_eq!(c.current_index(), Some(2));
}

#[test]
fn transport_commands_on_empty_playlist_are_no_ops() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);

    c.toggle_play_pause();
    c.next_track();
    c.prev_track();
    c.on_track_ended();
    c.seek(0.5);
    c.shuffle_playlist();

    assert_eq!(c.state(), PlaybackState::Stopped);
    assert_eq!(c.current_index(), None);
    assert!(c.media().loads.is_empty());
}

#[test]
fn end_of_track_follows_the_mode_table() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.append(tracks(3));

    c.play_track(1);
    c.on_track_ended();
    assert_eq!(c.current_index(), Some(2));

    c.on_track_ended();
    assert_eq!(c.current_index(), Some(2));
    assert_eq!(c.state(), PlaybackState::Stopped);

    c.set_repeat_mode(RepeatMode::All);
    c.play_track(2);
    c.on_track_ended();
    assert_eq!(c.current_index(), Some(0));

    c.set_repeat_mode(RepeatMode::One);
    let loads = c.media().loads.len();
    c.on_track_ended();
    assert_eq!(c.current_index(), Some(0));
    assert_eq!(c.media().loads.len(), loads + 1);
}

#[test]
fn repeat_one_wins_over_shuffle() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.append(tracks(5));
    c.play_track(2);
    c.set_repeat_mode(RepeatMode::One);
    c.set_shuffle(true);

    for _ in 0..50 {
        let loads = c.media().loads.len();
        c.next_track();
        assert_eq!(c.current_index(), Some(2));
        assert_eq!(c.media().loads.len(), loads + 1);
        assert_eq!(c.media().loads.last(), Some(&loaded_path(&c, 2)));
    }
}

#[test]
fn end_of_last_track_keeps_playing_when_shuffle_is_on() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.append(tracks(4));
    c.set_shuffle(true);

    for _ in 0..50 {
        c.play_track(3);
        let loads = c.media().loads.len();
        c.on_track_ended();
        assert_eq!(c.state(), PlaybackState::Playing);
        assert!(c.current_index().unwrap() < 4);
        assert_eq!(c.media().loads.len(), loads + 1);
    }
}

#[test]
fn tick_advances_only_when_the_backend_reports_end_while_playing() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.append(tracks(2));

    c.tick();
    assert_eq!(c.current_index(), Some(0));

    c.toggle_play_pause();
    c.media_mut().ended = true;
    c.tick();
    assert_eq!(c.current_index(), Some(0));

    c.toggle_play_pause();
    c.tick();
    assert_eq!(c.current_index(), Some(1));
    assert!(!c.media().ended);
}

#[test]
fn toggle_play_pause_flips_and_restarts_from_stopped() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.append(tracks(2));

    c.toggle_play_pause();
    assert_eq!(c.state(), PlaybackState::Paused);
    assert!(!c.media().playing);

    c.toggle_play_pause();
    assert_eq!(c.state(), PlaybackState::Playing);
    assert!(c.media().playing);

    c.play_track(1);
    c.next_track();
    assert_eq!(c.state(), PlaybackState::Stopped);
    c.toggle_play_pause();
    assert_eq!(c.state(), PlaybackState::Playing);
    assert_eq!(c.current_index(), Some(1));
}

#[test]
fn rejected_play_is_reported_and_not_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.media_mut().reject_play = true;

    c.append(tracks(3));
    assert_eq!(c.current_index(), Some(0));
    assert_eq!(c.state(), PlaybackState::Paused);
    assert!(c.last_error().is_some());
    assert_eq!(c.media().loads.len(), 1);
}

#[test]
fn undecodable_track_leaves_player_stopped_on_that_track() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    let list = tracks(3);
    c.media_mut().undecodable = Some(list[1].path.clone());
    c.append(list);

    c.next_track();
    assert_eq!(c.current_index(), Some(1));
    assert_eq!(c.state(), PlaybackState::Stopped);
    assert!(c.last_error().unwrap().contains("cannot decode"));

    c.play_track(2);
    assert_eq!(c.state(), PlaybackState::Playing);
    assert!(c.last_error().is_none());
}

#[test]
fn set_volume_clamps_applies_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    assert_eq!(c.volume(), 0.05);
    assert_eq!(c.media().volume, 0.05);

    c.set_volume(1.5);
    assert_eq!(c.volume(), 1.0);
    assert_eq!(c.media().volume, 1.0);

    c.set_volume(-0.2);
    assert_eq!(c.volume(), 0.0);

    c.set_volume(f32::NAN);
    assert_eq!(c.volume(), 0.0);

    c.set_volume(0.42);
    drop(c);

    let restored = controller(&dir);
    assert_eq!(restored.volume(), 0.42);
    assert_eq!(restored.media().volume, 0.42);
}

#[test]
fn seek_waits_for_duration_and_clamps_fraction() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.append(tracks(1));

    c.seek(0.5);
    assert!(c.media().seeks.is_empty());

    c.media_mut().length = Some(Duration::from_secs(200));
    c.seek(0.5);
    c.seek(1.7);
    c.seek(-1.0);
    assert_eq!(
        c.media().seeks,
        vec![
            Duration::from_secs(100),
            Duration::from_secs(200),
            Duration::ZERO
        ]
    );
}

#[test]
fn failed_seek_is_reported_and_does_not_advance() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.append(tracks(3));
    c.media_mut().length = Some(Duration::from_secs(200));
    c.media_mut().position = Duration::from_secs(30);
    c.media_mut().fail_seek = true;

    c.seek(0.5);
    assert!(c.last_error().unwrap().contains("file vanished"));
    assert!(c.media().seeks.is_empty());

    c.tick();
    assert_eq!(c.current_index(), Some(0));
    assert_eq!(c.state(), PlaybackState::Playing);
    assert_eq!(c.elapsed(), Duration::from_secs(30));
}

#[test]
fn mute_silences_output_without_touching_the_stored_volume() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.set_volume(0.6);

    c.toggle_mute();
    assert!(c.is_muted());
    assert_eq!(c.media().volume, 0.0);
    assert_eq!(c.volume(), 0.6);
    let stored = Preferences::at(dir.path().join("state.toml"));
    assert_eq!(stored.load_volume(0.05), 0.6);

    c.set_volume(0.3);
    assert_eq!(c.media().volume, 0.0);

    c.toggle_mute();
    assert!(!c.is_muted());
    assert_eq!(c.media().volume, 0.3);
    assert_eq!(stored.load_volume(0.05), 0.3);
}

#[test]
fn loaded_source_is_released_once_on_replace_and_clear() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.append(tracks(3));
    assert_eq!(c.media().unloads, 0);

    c.play_track(1);
    assert_eq!(c.media().unloads, 1);

    c.clear();
    assert_eq!(c.media().unloads, 2);
    assert!(c.playlist().is_empty());
    assert_eq!(c.current_index(), None);
    assert_eq!(c.state(), PlaybackState::Stopped);

    c.clear();
    assert_eq!(c.media().unloads, 2);
}

#[test]
fn metadata_for_a_cleared_track_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.append(tracks(2));
    let stale = c.playlist().get(1).unwrap().id;
    c.clear();
    c.append(tracks(2));

    let applied = c.apply_metadata(MetadataEvent {
        id: stale,
        result: Ok(TrackMetadata {
            title: Some("Ghost".to_string()),
            artist: Some("Ghost".to_string()),
            picture: None,
        }),
    });

    assert!(!applied);
    for t in c.playlist().tracks() {
        assert_ne!(t.display_name, "Ghost");
        assert_eq!(t.artist, ARTIST_LOADING);
    }
}

#[test]
fn late_metadata_does_not_replace_the_now_playing_track() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.append(tracks(2));
    let first = c.playlist().get(0).unwrap().id;
    let second = c.playlist().get(1).unwrap().id;
    c.next_track();

    let now_playing = c.apply_metadata(MetadataEvent {
        id: first,
        result: Ok(TrackMetadata {
            title: Some("First".to_string()),
            artist: Some("Someone".to_string()),
            picture: None,
        }),
    });
    assert!(!now_playing);
    assert_eq!(c.current_track().unwrap().id, second);
    assert_eq!(c.current_track().unwrap().artist, ARTIST_LOADING);

    let now_playing = c.apply_metadata(MetadataEvent {
        id: second,
        result: Err(MetadataError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            "no tags",
        ))),
    });
    assert!(now_playing);
    assert_eq!(c.current_track().unwrap().artist, ARTIST_UNKNOWN);
    assert!(c.current_track().unwrap().picture.is_none());
}

#[test]
fn worker_results_reach_the_current_track() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.append(tracks(1));

    let deadline = Instant::now() + Duration::from_secs(5);
    while !c.poll_metadata() {
        assert!(Instant::now() < deadline, "metadata never arrived");
        std::thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(c.current_track().unwrap().artist, "Worker Artist");
}

#[test]
fn shuffle_playlist_reorders_and_restarts_at_first() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.append(tracks(6));
    c.play_track(3);
    let before: HashSet<_> = c.playlist().tracks().iter().map(|t| t.id).collect();

    c.shuffle_playlist();

    let after: HashSet<_> = c.playlist().tracks().iter().map(|t| t.id).collect();
    assert_eq!(before, after);
    assert_eq!(c.current_index(), Some(0));
    assert_eq!(c.media().loaded, Some(loaded_path(&c, 0)));
    assert_eq!(c.state(), PlaybackState::Playing);
}

#[test]
fn shutdown_releases_the_source() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(&dir);
    c.append(tracks(1));
    c.shutdown();
    assert!(c.media().loaded.is_none());
    assert_eq!(c.state(), PlaybackState::Stopped);
}

#[test]
fn tags_are_read_once_per_track_across_replays() {
    let dir = tempfile::tempdir().unwrap();
    let reads = Arc::new(AtomicUsize::new(0));
    let mut c = PlaybackController::new(
        FakeMedia::default(),
        MetadataWorker::spawn(Arc::new(CountingExtractor(Arc::clone(&reads)))),
        Preferences::at(dir.path().join("state.toml")),
        0.05,
    );
    c.append(tracks(1));

    let deadline = Instant::now() + Duration::from_secs(5);
    while !c.poll_metadata() {
        assert!(Instant::now() < deadline, "metadata never arrived");
        std::thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(c.current_track().unwrap().artist, "Counted");

    c.set_repeat_mode(RepeatMode::One);
    c.next_track();
    c.on_track_ended();
    c.prev_track();
    assert_eq!(c.media().loads.len(), 4);

    // Joining the worker drains anything still queued.
    c.shutdown();
    assert_eq!(reads.load(Ordering::SeqCst), 1);
}
