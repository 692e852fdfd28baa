use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `TONEARM__`), and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("TONEARM")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.playback.tick_ms == 0 {
            return Err("playback.tick_ms must be >= 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.audio.initial_volume) {
            return Err("audio.initial_volume must be within 0.0..=1.0".to_string());
        }
        if self.audio.channels == 0 || self.audio.sample_rate == 0 {
            return Err("audio.channels and audio.sample_rate must be >= 1".to_string());
        }
        if !self.playback.volume_step.is_finite() || self.playback.volume_step < 0.0 {
            return Err("playback.volume_step must be a finite value >= 0".to_string());
        }
        if !self.playback.seek_step_percent.is_finite() || self.playback.seek_step_percent < 0.0 {
            return Err("playback.seek_step_percent must be a finite value >= 0".to_string());
        }
        if self.history.capacity == 0 {
            return Err("history.capacity must be >= 1".to_string());
        }
        if self.repair.program.trim().is_empty() {
            return Err("repair.program must not be empty".to_string());
        }
        Ok(())
    }

    /// History file location: the configured path or the XDG data default.
    pub fn history_path(&self) -> PathBuf {
        self.history
            .path
            .clone()
            .or_else(default_history_path)
            .unwrap_or_else(|| PathBuf::from("play_history.json"))
    }
}

/// Resolve the config path from `TONEARM_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("TONEARM_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/tonearm/config.toml`
/// or `~/.config/tonearm/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("tonearm").join("config.toml"))
}

/// `$XDG_DATA_HOME/tonearm/history.json` or `~/.local/share/tonearm/history.json`.
pub fn default_history_path() -> Option<PathBuf> {
    xdg_dir("XDG_DATA_HOME", ".local/share").map(|d| d.join("tonearm").join("history.json"))
}

/// `$XDG_STATE_HOME/tonearm/tonearm.log` or `~/.local/state/tonearm/tonearm.log`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("tonearm").join("tonearm.log"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
