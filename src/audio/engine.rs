use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{OutputStream, Sink};

use crate::config::AudioSettings;
use crate::error::{LoadError, SeekError};

use super::output::open_output;
use super::probe::duration_of;
use super::sink::create_sink;

/// Playback primitives the controller drives.
///
/// `RodioEngine` is the real implementation; tests substitute a scripted fake.
pub trait AudioEngine {
    /// Whether an output device is usable.
    fn is_ready(&self) -> bool;
    /// Decode `path` and keep it ready to play.
    fn load(&mut self, path: &Path) -> Result<(), LoadError>;
    /// Best-effort length of `path`, zero when unknown.
    fn probe_duration(&self, path: &Path) -> Duration;
    /// Start the loaded stream from its beginning.
    fn play(&mut self) -> Result<(), LoadError>;
    fn pause(&mut self);
    fn resume(&mut self);
    /// Halt output. Safe to call when nothing is playing.
    fn stop(&mut self);
    /// Stop and forget the loaded file.
    fn unload(&mut self);
    fn set_volume(&mut self, level: f32);
    /// Whether the device is still producing sound for the current stream.
    fn is_busy(&self) -> bool;
    fn seek(&mut self, offset: Duration) -> Result<(), SeekError>;
}

/// `AudioEngine` on top of a `rodio` output stream and a single sink.
pub struct RodioEngine {
    stream: Option<OutputStream>,
    sink: Option<Sink>,
    loaded: Option<PathBuf>,
    started: bool,
    volume: f32,
}

impl RodioEngine {
    /// Open the output device. A missing device leaves the engine not ready
    /// rather than failing: the rest of the app stays usable.
    pub fn initialize(settings: &AudioSettings) -> Self {
        let stream = match open_output(settings) {
            Ok(mut stream) => {
                // rodio logs to stderr when the stream is dropped, which garbles the TUI.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                tracing::error!("{e}");
                None
            }
        };

        Self {
            stream,
            sink: None,
            loaded: None,
            started: false,
            volume: settings.initial_volume.clamp(0.0, 1.0),
        }
    }

    fn stream(&self) -> Result<&OutputStream, LoadError> {
        self.stream.as_ref().ok_or(LoadError::NotReady)
    }
}

impl AudioEngine for RodioEngine {
    fn is_ready(&self) -> bool {
        self.stream.is_some()
    }

    fn load(&mut self, path: &Path) -> Result<(), LoadError> {
        let sink = create_sink(self.stream()?, path, self.volume)?;
        self.stop();
        self.sink = Some(sink);
        self.started = false;
        self.loaded = Some(path.to_path_buf());
        tracing::debug!("loaded {}", path.display());
        Ok(())
    }

    fn probe_duration(&self, path: &Path) -> Duration {
        duration_of(path)
    }

    fn play(&mut self) -> Result<(), LoadError> {
        let Some(path) = self.loaded.clone() else {
            return Ok(());
        };

        // A loaded sink that never played is already at the beginning;
        // anything else gets a fresh decoder.
        if self.started || self.sink.is_none() {
            let sink = create_sink(self.stream()?, &path, self.volume)?;
            self.stop();
            self.sink = Some(sink);
        }

        if let Some(sink) = &self.sink {
            sink.play();
            self.started = true;
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.started = false;
    }

    fn unload(&mut self) {
        self.stop();
        self.loaded = None;
    }

    fn set_volume(&mut self, level: f32) {
        self.volume = level.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| !s.empty())
    }

    fn seek(&mut self, offset: Duration) -> Result<(), SeekError> {
        let sink = self
            .sink
            .as_ref()
            .ok_or_else(|| SeekError("nothing is loaded".to_string()))?;
        sink.try_seek(offset).map_err(|e| SeekError(e.to_string()))
    }
}
