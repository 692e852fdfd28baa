use std::fs::{self, File};
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod audio;
mod config;
mod error;
mod history;
mod library;
mod player;
mod repair;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    tracing::info!("tonearm {} starting", env!("CARGO_PKG_VERSION"));

    let result = runtime::run();
    if let Err(e) = &result {
        tracing::error!("exiting with error: {e}");
    }
    result
}

/// Log to a file; the terminal belongs to the TUI. No file, no logging.
fn init_logging() {
    let Some(path) = config::default_log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = File::options().create(true).append(true).open(&path) else {
        return;
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tonearm=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
}
