use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Focus};
use crate::audio::AudioEngine;
use crate::config;
use crate::player::{Clock, PlaybackController};
use crate::ui;

/// Upper bound on how long input polling blocks while nothing is playing.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Main terminal event loop: drives the progress timer, draws the UI and
/// dispatches key presses. Returns `Ok(())` when the user quits.
pub fn run<E: AudioEngine, C: Clock>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut PlaybackController<E, C>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        player.tick();
        sync_history(app, player);

        terminal.draw(|f| ui::draw(f, app, player, settings))?;

        let wait = player
            .next_tick_in()
            .map_or(IDLE_POLL, |due| due.min(IDLE_POLL));
        if event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, player) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn sync_history<E: AudioEngine, C: Clock>(app: &mut App, player: &mut PlaybackController<E, C>) {
    if player.history_mut().take_dirty() {
        app.history_changed(player.history().len());
    }
}

/// Apply one key press. Returns true when the user asked to quit.
fn handle_key_event<E: AudioEngine, C: Clock>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &mut PlaybackController<E, C>,
) -> bool {
    app.dismiss_notification();

    if app.confirm_clear {
        app.cancel_clear();
        if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
            player.clear_history();
            app.notify_info("History", "play history cleared");
        }
        sync_history(app, player);
        return false;
    }

    let seek_step = settings.playback.seek_step_percent;
    let volume_step = settings.playback.volume_step;

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Char('j') | KeyCode::Down => app.next(player.history().len()),
        KeyCode::Char('k') | KeyCode::Up => app.prev(player.history().len()),
        KeyCode::Enter => open_selected(app, player),
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            if let Err(e) = player.toggle_play() {
                tracing::error!("{e}");
                app.notify_error(&e);
            }
        }
        KeyCode::Char('s') => player.stop(),
        KeyCode::Char('h') | KeyCode::Left => player.seek_by(-seek_step),
        KeyCode::Char('l') | KeyCode::Right => player.seek_by(seek_step),
        KeyCode::Char(c @ '0'..='9') => {
            let tenth = c.to_digit(10).unwrap_or(0);
            player.seek(f64::from(tenth) * 10.0);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => player.adjust_volume(volume_step),
        KeyCode::Char('-') => player.adjust_volume(-volume_step),
        KeyCode::Char('c') => {
            if !player.history().is_empty() {
                app.request_clear();
            }
        }
        _ => {}
    }

    sync_history(app, player);
    false
}

/// Open whatever the focused pane has selected.
fn open_selected<E: AudioEngine, C: Clock>(app: &mut App, player: &mut PlaybackController<E, C>) {
    let path: Option<PathBuf> = match app.focus {
        Focus::Files => app.selected_file().map(|f| f.path.clone()),
        Focus::History => player
            .history()
            .get(app.history_selected)
            .map(|e| e.path.clone()),
    };
    let Some(path) = path else {
        return;
    };

    // History entries can outlive the files they point at.
    if app.focus == Focus::History && !path.exists() {
        tracing::warn!("history entry {} no longer exists", path.display());
        app.notify_missing(&path);
        return;
    }

    if let Err(e) = player.open_file(&path) {
        tracing::error!("{e}");
        app.notify_error(&e);
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;
    use crate::app::{App, Focus};
    use crate::config::Settings;
    use crate::library::AudioFile;
    use crate::player::PlayerState;
    use crate::player::tests::{Harness, harness};

    /// Feed one key press with default settings; true means quit.
    fn press(h: &mut Harness, app: &mut App, code: KeyCode) -> bool {
        let key = KeyEvent::new(code, KeyModifiers::NONE);
        handle_key_event(key, &Settings::default(), app, &mut h.controller)
    }

    fn app_with(paths: &[&str]) -> App {
        App::new(
            paths
                .iter()
                .map(|p| AudioFile {
                    path: PathBuf::from(p),
                    name: p.rsplit('/').next().unwrap_or(p).to_string(),
                    duration: None,
                })
                .collect(),
        )
    }

    #[test]
    fn q_quits_and_other_keys_do_not() {
        let mut h = harness();
        let mut app = app_with(&[]);
        assert!(!press(&mut h, &mut app, KeyCode::Char('x')));
        assert!(press(&mut h, &mut app, KeyCode::Char('q')));
    }

    #[test]
    fn enter_opens_selected_file_and_space_pauses() {
        let mut h = harness();
        let mut app = app_with(&["/music/a.mp3", "/music/b.mp3"]);

        press(&mut h, &mut app, KeyCode::Char('j'));
        press(&mut h, &mut app, KeyCode::Enter);
        assert_eq!(h.controller.state(), PlayerState::Playing);
        assert_eq!(
            h.controller.session().current_file(),
            Some(Path::new("/music/b.mp3"))
        );

        press(&mut h, &mut app, KeyCode::Char(' '));
        assert_eq!(h.controller.state(), PlayerState::Paused);
    }

    #[test]
    fn digit_keys_seek_to_tenths() {
        let mut h = harness();
        let mut app = app_with(&["/music/a.mp3"]);
        press(&mut h, &mut app, KeyCode::Enter);

        press(&mut h, &mut app, KeyCode::Char('5'));
        let seeks = h.engine.0.borrow().seeks.clone();
        assert_eq!(seeks, vec![Duration::from_secs(100)]);
    }

    #[test]
    fn clear_history_requires_confirmation() {
        let mut h = harness();
        let mut app = app_with(&["/music/a.mp3"]);
        press(&mut h, &mut app, KeyCode::Enter);
        assert_eq!(h.controller.history().len(), 1);

        press(&mut h, &mut app, KeyCode::Char('c'));
        assert!(app.confirm_clear);
        press(&mut h, &mut app, KeyCode::Char('n'));
        assert!(!app.confirm_clear);
        assert_eq!(h.controller.history().len(), 1);

        press(&mut h, &mut app, KeyCode::Char('c'));
        press(&mut h, &mut app, KeyCode::Char('y'));
        assert!(h.controller.history().is_empty());
        assert_eq!(app.history_selected, 0);
    }

    #[test]
    fn missing_history_file_is_reported_without_loading() {
        let mut h = harness();
        let mut app = app_with(&["/music/gone.mp3"]);
        press(&mut h, &mut app, KeyCode::Enter);
        press(&mut h, &mut app, KeyCode::Char('s'));

        press(&mut h, &mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::History);
        press(&mut h, &mut app, KeyCode::Enter);

        let note = app.notification.clone().unwrap();
        assert_eq!(note.title, "File not found");
        assert_eq!(h.controller.state(), PlayerState::Stopped);
    }

    #[test]
    fn failed_open_becomes_an_error_notification() {
        let mut h = harness();
        let broken = PathBuf::from("/music/broken.mp3");
        h.engine.0.borrow_mut().corrupt.insert(broken);
        let mut app = app_with(&["/music/broken.mp3"]);

        press(&mut h, &mut app, KeyCode::Enter);

        let note = app.notification.clone().unwrap();
        assert!(note.is_error);
        assert_eq!(note.title, "Repair failed");
        assert_eq!(h.controller.state(), PlayerState::Failed);
    }

    #[test]
    fn volume_keys_step_and_clamp() {
        let mut h = harness();
        let mut app = app_with(&[]);
        for _ in 0..10 {
            press(&mut h, &mut app, KeyCode::Char('+'));
        }
        assert_eq!(h.controller.session().volume(), 1.0);
        press(&mut h, &mut app, KeyCode::Char('-'));
        assert!((h.controller.session().volume() - 0.95).abs() < 1e-4);
    }
}
