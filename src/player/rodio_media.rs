//! `MediaElement` backed by a `rodio` sink on the default output device.
//!
//! Seeking rebuilds the sink and skips into the file, so the position the
//! sink reports is relative to the last seek target (`offset`).

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::file::AudioFile;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use super::media::MediaElement;
use super::types::PlaybackError;

pub struct RodioMedia {
    stream: OutputStream,
    sink: Option<Sink>,
    path: Option<PathBuf>,
    duration: Option<Duration>,
    offset: Duration,
    volume: f32,
}

impl RodioMedia {
    pub fn open_default() -> Result<Self, PlaybackError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would land on the TUI.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            path: None,
            duration: None,
            offset: Duration::ZERO,
            volume: 1.0,
        })
    }
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), PlaybackError> {
    let file = File::open(path).map_err(|source| PlaybackError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder =
        Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::Unsupported {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    let total = decoder.total_duration();

    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}

/// Container-level duration for formats the decoder can't size up front (e.g. VBR mp3).
fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|f| f.properties().duration())
        .filter(|d| !d.is_zero())
}

impl MediaElement for RodioMedia {
    fn load(&mut self, path: &Path) -> Result<(), PlaybackError> {
        self.unload();

        let (sink, total) = create_sink_at(&self.stream, path, Duration::ZERO)?;
        sink.set_volume(self.volume);

        self.duration = total.or_else(|| probe_duration(path));
        self.path = Some(path.to_path_buf());
        self.offset = Duration::ZERO;
        self.sink = Some(sink);
        Ok(())
    }

    fn unload(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.path = None;
        self.duration = None;
        self.offset = Duration::ZERO;
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let sink = self.sink.as_ref().ok_or(PlaybackError::NothingLoaded)?;
        sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
    }

    fn seek(&mut self, to: Duration) -> Result<(), PlaybackError> {
        let (Some(path), Some(old)) = (self.path.as_deref(), self.sink.as_ref()) else {
            return Err(PlaybackError::NothingLoaded);
        };
        let to = self.duration.map_or(to, |d| to.min(d));
        let was_paused = old.is_paused();

        // The old sink keeps playing if the file can no longer be reopened.
        let (sink, _) = create_sink_at(&self.stream, path, to)?;
        sink.set_volume(self.volume);
        old.stop();
        if !was_paused {
            sink.play();
        }

        self.sink = Some(sink);
        self.offset = to;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(volume);
        }
    }

    fn position(&self) -> Duration {
        let Some(sink) = self.sink.as_ref() else {
            return Duration::ZERO;
        };
        let pos = self.offset + sink.get_pos();
        self.duration.map_or(pos, |d| pos.min(d))
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn has_ended(&self) -> bool {
        self.sink
            .as_ref()
            .map(|s| !s.is_paused() && s.empty())
            .unwrap_or(false)
    }
}
