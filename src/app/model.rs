//! Application model types: `App`, `Focus` and `Notification`.
//!
//! Playback state lives in the controller; this struct only tracks what the
//! user is looking at.

use std::path::Path;

use crate::error::PlayerError;
use crate::library::AudioFile;

/// Which list receives navigation keys.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Files,
    History,
}

/// A message shown under the status box until the next key press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub is_error: bool,
}

/// The main application model.
pub struct App {
    pub files: Vec<AudioFile>,
    pub focus: Focus,
    pub file_selected: usize,
    pub history_selected: usize,
    pub notification: Option<Notification>,
    /// Waiting for y/n before clearing the history.
    pub confirm_clear: bool,
    pub current_dir: Option<String>,
}

impl App {
    /// Create a new `App` with the provided list of `files`.
    pub fn new(files: Vec<AudioFile>) -> Self {
        Self {
            files,
            focus: Focus::Files,
            file_selected: 0,
            history_selected: 0,
            notification: None,
            confirm_clear: false,
            current_dir: None,
        }
    }

    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Files => Focus::History,
            Focus::History => Focus::Files,
        };
    }

    /// Move the selection in the focused pane down, wrapping to the top.
    pub fn next(&mut self, history_len: usize) {
        match self.focus {
            Focus::Files => self.file_selected = wrap_next(self.file_selected, self.files.len()),
            Focus::History => self.history_selected = wrap_next(self.history_selected, history_len),
        }
    }

    /// Move the selection in the focused pane up, wrapping to the bottom.
    pub fn prev(&mut self, history_len: usize) {
        match self.focus {
            Focus::Files => self.file_selected = wrap_prev(self.file_selected, self.files.len()),
            Focus::History => self.history_selected = wrap_prev(self.history_selected, history_len),
        }
    }

    pub fn selected_file(&self) -> Option<&AudioFile> {
        self.files.get(self.file_selected)
    }

    /// Keep the history cursor inside a list that just changed length.
    pub fn history_changed(&mut self, history_len: usize) {
        if history_len == 0 {
            self.history_selected = 0;
        } else {
            self.history_selected = self.history_selected.min(history_len - 1);
        }
    }

    pub fn notify_error(&mut self, err: &PlayerError) {
        self.notification = Some(Notification {
            title: err.title().to_string(),
            message: err.to_string(),
            is_error: true,
        });
    }

    pub fn notify_info(&mut self, title: &str, message: impl Into<String>) {
        self.notification = Some(Notification {
            title: title.to_string(),
            message: message.into(),
            is_error: false,
        });
    }

    pub fn notify_missing(&mut self, path: &Path) {
        self.notification = Some(Notification {
            title: "File not found".to_string(),
            message: format!("{} no longer exists", path.display()),
            is_error: true,
        });
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    pub fn request_clear(&mut self) {
        self.confirm_clear = true;
    }

    pub fn cancel_clear(&mut self) {
        self.confirm_clear = false;
    }
}

fn wrap_next(current: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (current + 1) % len }
}

fn wrap_prev(current: usize, len: usize) -> usize {
    match (current, len) {
        (_, 0) => 0,
        (0, n) => n - 1,
        (c, n) => (c - 1).min(n - 1),
    }
}
