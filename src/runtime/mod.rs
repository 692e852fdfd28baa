use std::env;
use std::path::{Path, PathBuf};

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::RodioEngine;
use crate::history::HistoryStore;
use crate::library::scan;
use crate::player::{PlaybackController, SystemClock};

mod event_loop;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let target = env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    // A file argument is opened directly; its directory fills the file list.
    let (dir, open_now): (PathBuf, Option<PathBuf>) = if target.is_file() {
        let parent = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();
        (parent, Some(target))
    } else {
        (target, None)
    };

    // Canonical paths so scanned files match history entries.
    let dir = std::fs::canonicalize(&dir).unwrap_or(dir);
    let files = scan(&dir, &settings.library);
    let mut app = App::new(files);
    app.set_current_dir(dir.display().to_string());

    let engine = RodioEngine::initialize(&settings.audio);
    let history = HistoryStore::load(settings.history_path(), settings.history.capacity);
    tracing::info!("history: {} entries from {}", history.len(), history.path().display());
    let mut player = PlaybackController::new(engine, SystemClock, history, &settings);

    if !player.audio_ready() {
        app.notify_info(
            "Audio unavailable",
            "no output device; history can still be browsed",
        );
    }
    if let Some(path) = open_now {
        if let Err(e) = player.open_file(&path) {
            tracing::error!("{e}");
            app.notify_error(&e);
        }
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut player);

    player.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
