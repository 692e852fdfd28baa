//! Error types for the playback, repair and history subsystems.
//!
//! Each failure kind gets its own enum so callers can decide what to surface
//! and what to swallow. `PlayerError` aggregates the kinds that reach the UI.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// The audio output device could not be opened.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("no usable audio output device: {0}")]
    NoDevice(String),
    #[error("audio output is not available")]
    Unavailable,
}

/// Direct decode of a file failed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unsupported or corrupt audio in {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
    #[error("audio output is not ready")]
    NotReady,
}

impl LoadError {
    /// Whether the repair pipeline may be able to fix this failure.
    pub fn is_repairable(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// The repair pipeline could not produce a playable file.
#[derive(Debug, Error)]
pub enum RepairError {
    #[error("cannot create temporary file: {0}")]
    TempFile(#[source] io::Error),
    #[error("cannot run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("transcoder exited with {status}: {stderr}")]
    Transcode { status: ExitStatus, stderr: String },
    #[error("no automatic fix is possible ({reason}); install ffmpeg for better compatibility")]
    NoFixAvailable { reason: String },
    #[error("cannot write repaired audio: {0}")]
    Render(String),
    #[error("repaired file still cannot be played: {0}")]
    Reload(#[source] LoadError),
}

/// Seeking is not supported for the current stream.
#[derive(Debug, Error)]
#[error("seek failed: {0}")]
pub struct SeekError(pub String);

/// History could not be read or written.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("history io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("history file is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced to the user by the playback controller.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error(transparent)]
    Init(#[from] InitError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Repair(#[from] RepairError),
}

impl PlayerError {
    /// Short title used for user-visible notifications.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Init(_) => "Audio unavailable",
            Self::Load(_) => "Load failed",
            Self::Repair(_) => "Repair failed",
        }
    }
}
