use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::repair::TempAudioFile;

/// Where the controller's state machine currently is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlayerState {
    /// Nothing has been loaded yet.
    #[default]
    Empty,
    Loading,
    Playing,
    Paused,
    Stopped,
    /// The last load attempt failed; nothing is loaded.
    Failed,
}

impl PlayerState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Loading => "Loading",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Stopped => "Stopped",
            Self::Failed => "Failed",
        }
    }
}

/// The currently loaded track and its playback clock.
///
/// Invariant: `paused` implies `playing`. The temporary file, when present,
/// belongs to this session and is deleted when the session lets go of it.
#[derive(Debug)]
pub struct PlaybackSession {
    current_file: Option<PathBuf>,
    temporary_file: Option<TempAudioFile>,
    duration: Duration,
    playing: bool,
    paused: bool,
    volume: f32,
    /// Instant at which elapsed time was zero, while running.
    reference_start: Option<Instant>,
    /// Elapsed time frozen at the moment of pausing.
    paused_elapsed: Duration,
}

impl PlaybackSession {
    pub fn new(volume: f32) -> Self {
        Self {
            current_file: None,
            temporary_file: None,
            duration: Duration::ZERO,
            playing: false,
            paused: false,
            volume: volume.clamp(0.0, 1.0),
            reference_start: None,
            paused_elapsed: Duration::ZERO,
        }
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn temporary_file(&self) -> Option<&Path> {
        self.temporary_file.as_ref().map(TempAudioFile::path)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, level: f32) {
        self.volume = level.clamp(0.0, 1.0);
    }

    /// Adopt a freshly loaded file; any previous temp file is released first.
    pub fn load(&mut self, file: PathBuf, temporary: Option<TempAudioFile>, duration: Duration) {
        self.release_temporary();
        self.current_file = Some(file);
        self.temporary_file = temporary;
        self.duration = duration;
        self.playing = false;
        self.paused = false;
        self.reference_start = None;
        self.paused_elapsed = Duration::ZERO;
    }

    /// Playback (re)started from the beginning at `now`.
    pub fn begin(&mut self, now: Instant) {
        self.playing = true;
        self.paused = false;
        self.reference_start = Some(now);
        self.paused_elapsed = Duration::ZERO;
    }

    pub fn pause(&mut self, now: Instant) {
        if !self.playing || self.paused {
            return;
        }
        self.paused_elapsed = self.elapsed(now);
        self.paused = true;
        self.reference_start = None;
    }

    /// Continue from where `pause` froze the clock.
    pub fn resume(&mut self, now: Instant) {
        if !self.paused {
            return;
        }
        self.paused = false;
        self.reference_start = Some(now.checked_sub(self.paused_elapsed).unwrap_or(now));
    }

    /// Move the clock so that `elapsed(now) == offset`.
    pub fn seek_to(&mut self, offset: Duration, now: Instant) {
        if self.paused {
            self.paused_elapsed = offset;
        } else {
            self.reference_start = Some(now.checked_sub(offset).unwrap_or(now));
        }
    }

    /// Playback reached the end of the stream; the file stays loaded.
    pub fn finish(&mut self) {
        self.playing = false;
        self.paused = false;
        self.reference_start = None;
        self.paused_elapsed = Duration::ZERO;
    }

    /// Forget the loaded file and delete any temporary copy.
    pub fn reset(&mut self) {
        self.finish();
        self.release_temporary();
        self.current_file = None;
        self.duration = Duration::ZERO;
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        if self.paused {
            return self.paused_elapsed;
        }
        match self.reference_start {
            Some(start) => now.saturating_duration_since(start),
            None => Duration::ZERO,
        }
    }

    /// Completed fraction in percent, when the duration is known.
    pub fn percent(&self, now: Instant) -> Option<f64> {
        if self.duration.is_zero() {
            return None;
        }
        let ratio = self.elapsed(now).as_secs_f64() / self.duration.as_secs_f64();
        Some((ratio * 100.0).clamp(0.0, 100.0))
    }

    fn release_temporary(&mut self) {
        if let Some(temp) = self.temporary_file.take() {
            temp.release();
        }
    }
}
