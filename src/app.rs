//! Application module: exposes the view model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the scanned file list,
//! pane focus, selections and the notification line.

mod model;

pub use model::*;
