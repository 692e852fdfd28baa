use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::audio::AudioEngine;
use crate::config::Settings;
use crate::error::{InitError, PlayerError, RepairError};
use crate::history::HistoryStore;
use crate::repair::{Repairer, TempAudioFile};

use super::session::{PlaybackSession, PlayerState};
use super::timer::{Clock, ProgressTimer, SystemClock};

/// Last computed playback position, refreshed by `tick`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Progress {
    pub elapsed: Duration,
    pub duration: Duration,
    /// Completed percentage, when the duration is known.
    pub percent: Option<f64>,
}

/// Owns the audio engine, the session and the history, and runs the
/// Empty → Loading → Playing ⇄ Paused → Stopped state machine.
pub struct PlaybackController<E: AudioEngine, C: Clock = SystemClock> {
    engine: E,
    clock: C,
    repairer: Repairer,
    repair_enabled: bool,
    history: HistoryStore,
    session: PlaybackSession,
    state: PlayerState,
    timer: ProgressTimer,
    progress: Progress,
}

impl<E: AudioEngine, C: Clock> PlaybackController<E, C> {
    pub fn new(mut engine: E, clock: C, history: HistoryStore, settings: &Settings) -> Self {
        let session = PlaybackSession::new(settings.audio.initial_volume);
        engine.set_volume(session.volume());

        Self {
            engine,
            clock,
            repairer: Repairer::new(&settings.repair),
            repair_enabled: settings.repair.enabled,
            history,
            session,
            state: PlayerState::Empty,
            timer: ProgressTimer::new(Duration::from_millis(settings.playback.tick_ms.max(1))),
            progress: Progress::default(),
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryStore {
        &mut self.history
    }

    pub fn audio_ready(&self) -> bool {
        self.engine.is_ready()
    }

    /// Whether play/pause/stop/seek have anything to act on.
    pub fn transport_enabled(&self) -> bool {
        self.engine.is_ready() && self.session.current_file().is_some()
    }

    /// Load `path` and start playing it, repairing it first if the decoder rejects it.
    pub fn open_file(&mut self, path: &Path) -> Result<(), PlayerError> {
        if !self.engine.is_ready() {
            tracing::warn!("cannot open {}: no audio output", path.display());
            return Err(InitError::Unavailable.into());
        }

        let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.stop();
        self.set_state(PlayerState::Loading);

        let temporary = match self.load_into_engine(&path) {
            Ok(temporary) => temporary,
            Err(e) => {
                self.fail();
                return Err(e);
            }
        };

        let playable: PathBuf = temporary
            .as_ref()
            .map(|t| t.path().to_path_buf())
            .unwrap_or_else(|| path.clone());
        let duration = self.engine.probe_duration(&playable);
        self.session.load(path.clone(), temporary, duration);

        if let Err(e) = self.engine.play() {
            self.fail();
            return Err(e.into());
        }
        let now = self.clock.now();
        self.session.begin(now);
        self.set_state(PlayerState::Playing);
        self.timer.start(now);
        self.refresh_progress(now);

        tracing::info!("playing {} ({:.1}s)", path.display(), duration.as_secs_f64());
        self.history.record(&path);
        Ok(())
    }

    /// Direct load, falling back to the repair pipeline for corrupt or unsupported input.
    fn load_into_engine(&mut self, path: &Path) -> Result<Option<TempAudioFile>, PlayerError> {
        let err = match self.engine.load(path) {
            Ok(()) => return Ok(None),
            Err(e) => e,
        };
        if !err.is_repairable() || !self.repair_enabled {
            tracing::warn!("load failed: {err}");
            return Err(err.into());
        }

        tracing::warn!("direct load failed ({err}), attempting repair");
        let temporary = self.repairer.repair(path)?;
        match self.engine.load(temporary.path()) {
            Ok(()) => Ok(Some(temporary)),
            Err(e) => {
                temporary.release();
                Err(RepairError::Reload(e).into())
            }
        }
    }

    /// Pause, resume, or restart playback of the loaded file.
    pub fn toggle_play(&mut self) -> Result<(), PlayerError> {
        if self.session.current_file().is_none() {
            return Ok(());
        }

        let now = self.clock.now();
        match self.state {
            PlayerState::Playing => {
                self.engine.pause();
                self.session.pause(now);
                self.timer.cancel();
                self.set_state(PlayerState::Paused);
            }
            PlayerState::Paused => {
                self.engine.resume();
                self.session.resume(now);
                self.set_state(PlayerState::Playing);
                self.timer.start(now);
            }
            _ => {
                if let Err(e) = self.engine.play() {
                    self.fail();
                    return Err(e.into());
                }
                self.session.begin(now);
                self.set_state(PlayerState::Playing);
                self.timer.start(now);
            }
        }
        self.refresh_progress(now);
        Ok(())
    }

    /// Halt output and tear the session down. Idempotent.
    pub fn stop(&mut self) {
        self.engine.unload();
        self.timer.cancel();
        self.session.reset();
        self.progress = Progress::default();
        if !matches!(self.state, PlayerState::Empty | PlayerState::Failed) {
            self.set_state(PlayerState::Stopped);
        }
    }

    /// Jump to `percent` (0–100) of the track.
    ///
    /// Ignored unless something is playing (paused counts) with a known
    /// duration. A seek the stream does not support is logged and otherwise ignored.
    pub fn seek(&mut self, percent: f64) {
        if !self.session.is_playing() {
            return;
        }
        let duration = self.session.duration();
        if duration.is_zero() {
            tracing::debug!("seek ignored: duration unknown");
            return;
        }

        let percent = if percent.is_finite() {
            percent.clamp(0.0, 100.0)
        } else {
            0.0
        };
        let offset = duration.mul_f64(percent / 100.0);
        if let Err(e) = self.engine.seek(offset) {
            tracing::warn!("{e}");
            return;
        }

        let now = self.clock.now();
        self.session.seek_to(offset, now);
        self.refresh_progress(now);
    }

    /// Seek relative to the current position, in percentage points.
    pub fn seek_by(&mut self, delta_percent: f64) {
        let now = self.clock.now();
        if let Some(current) = self.session.percent(now) {
            self.seek(current + delta_percent);
        }
    }

    pub fn set_volume(&mut self, level: f32) {
        self.session.set_volume(level);
        self.engine.set_volume(self.session.volume());
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        self.set_volume(self.session.volume() + delta);
    }

    /// Run the periodic progress refresh if it is due. Returns true when it ran.
    ///
    /// Detects natural end of track: once the engine is no longer busy the
    /// state moves to `Stopped` and the shown progress goes back to zero. The
    /// file stays loaded for a replay.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        if !self.timer.poll(now) {
            return false;
        }
        if self.state != PlayerState::Playing {
            self.timer.cancel();
            return false;
        }

        self.refresh_progress(now);
        if !self.engine.is_busy() {
            tracing::info!("end of track");
            self.engine.stop();
            self.session.finish();
            self.timer.cancel();
            self.set_state(PlayerState::Stopped);
            self.progress = Progress::default();
            return true;
        }

        self.timer.reschedule(now);
        true
    }

    /// How long the event loop may sleep before the next `tick` is due.
    pub fn next_tick_in(&self) -> Option<Duration> {
        self.timer.time_until_due(self.clock.now())
    }

    pub fn clear_history(&mut self) {
        tracing::info!("clearing play history");
        self.history.clear();
    }

    /// Stop playback, delete temp files and flush history before exit.
    pub fn shutdown(&mut self) {
        self.stop();
        self.history.save();
    }

    fn set_state(&mut self, next: PlayerState) {
        if self.state != next {
            tracing::debug!("state {} -> {}", self.state.label(), next.label());
            if next != PlayerState::Playing {
                self.timer.cancel();
            }
            self.state = next;
        }
    }

    fn fail(&mut self) {
        self.engine.unload();
        self.session.reset();
        self.progress = Progress::default();
        self.set_state(PlayerState::Failed);
    }

    fn refresh_progress(&mut self, now: Instant) {
        self.progress = Progress {
            elapsed: self.session.elapsed(now),
            duration: self.session.duration(),
            percent: self.session.percent(now),
        };
    }
}
