use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tonearm/config.toml`,
/// falling back to `~/.config/tonearm/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TONEARM__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub playback: PlaybackSettings,
    pub repair: RepairSettings,
    pub history: HistorySettings,
    pub library: LibrarySettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Preferred output sample rate. Falls back to the device default if unsupported.
    pub sample_rate: u32,
    /// Preferred output channel count.
    pub channels: u16,
    /// Preferred output buffer size in frames.
    pub buffer_size: u32,
    /// Volume applied at startup, in `[0, 1]`.
    pub initial_volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 2,
            buffer_size: 2048,
            initial_volume: 0.75,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Progress refresh interval (milliseconds).
    pub tick_ms: u64,
    /// Percentage to scrub when pressing `h` / `l`.
    pub seek_step_percent: f64,
    /// Volume change per `+` / `-` press.
    pub volume_step: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            seek_step_percent: 5.0,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RepairSettings {
    /// Try to transcode files the decoder rejects as corrupt or unsupported.
    pub enabled: bool,
    /// Transcoder executable, looked up on `PATH` unless absolute.
    pub program: String,
    /// Where repaired files are written. Defaults to the system temp dir.
    pub temp_dir: Option<PathBuf>,
}

impl Default for RepairSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "ffmpeg".to_string(),
            temp_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// History file. Defaults to `$XDG_DATA_HOME/tonearm/history.json`.
    pub path: Option<PathBuf>,
    /// Maximum number of remembered files.
    pub capacity: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            path: None,
            capacity: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp3".into(),
                "wav".into(),
                "ogg".into(),
                "flac".into(),
                "aac".into(),
                "m4a".into(),
            ],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ tonearm ~ ".to_string(),
        }
    }
}
