//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, Focus};
use crate::audio::AudioEngine;
use crate::config::Settings;
use crate::history::display_name;
use crate::player::{Clock, PlaybackController, PlayerState};

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Render the controls help text, incorporating the seek step.
fn controls_text(seek_step_percent: f64) -> String {
    [
        "[j/k] up/down".to_string(),
        "[tab] files/history".to_string(),
        "[enter] open".to_string(),
        "[space/p] play/pause".to_string(),
        "[s] stop".to_string(),
        format!("[h/l] seek -/+{seek_step_percent}%"),
        "[0-9] seek to 0-90%".to_string(),
        "[+/-] volume".to_string(),
        "[c] clear history".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Keep `selected` roughly centered in a window of `height` rows.
fn visible_window(total: usize, selected: usize, height: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    items: Vec<String>,
    selected: usize,
    focused: bool,
) {
    let total = items.len();
    let (start, end) = visible_window(total, selected, area.height.saturating_sub(2) as usize);
    let visible: Vec<ListItem> = items
        .into_iter()
        .skip(start)
        .take(end - start)
        .map(ListItem::new)
        .collect();

    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let list = List::new(visible)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(title),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if total > 0 && focused {
        state.select(Some(selected.saturating_sub(start)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the entire UI into the provided `frame`.
pub fn draw<E: AudioEngine, C: Clock>(
    frame: &mut Frame,
    app: &App,
    player: &PlaybackController<E, C>,
    settings: &Settings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(settings.ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" tonearm ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status = {
        let mut parts: Vec<String> = Vec::new();
        if !player.audio_ready() {
            parts.push("AUDIO: unavailable".to_string());
        }

        let session = player.session();
        let state = player.state();
        match session.current_file() {
            Some(path) => parts.push(format!("Song: {}", display_name(path))),
            None if state == PlayerState::Failed => parts.push("Song: -".to_string()),
            None => parts.push("No file loaded".to_string()),
        }
        parts.push(state.label().to_string());
        if session.temporary_file().is_some() {
            parts.push("repaired".to_string());
        }
        parts.push(format!("Vol: {:.0}%", session.volume() * 100.0));

        if let Some(dir) = &app.current_dir {
            parts.push(format!("Dir: {}", dir));
        }
        parts.join(" • ")
    };
    let status_par = Paragraph::new(status)
        .block(Block::bordered().padding(LEFT_PAD).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Progress
    let progress = player.progress();
    let time = format!(
        "{} / {}",
        format_mmss(progress.elapsed),
        format_mmss(progress.duration)
    );
    let ratio = progress.percent.map(|p| (p / 100.0).clamp(0.0, 1.0)).unwrap_or(0.0);
    let gauge = Gauge::default()
        .block(Block::bordered().title(" progress "))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ratio)
        .label(time);
    frame.render_widget(gauge, chunks[2]);

    // Notification line
    let (title, text, style) = match &app.notification {
        Some(n) if n.is_error => (
            format!(" {} ", n.title),
            n.message.clone(),
            Style::default().fg(Color::Red),
        ),
        Some(n) => (format!(" {} ", n.title), n.message.clone(), Style::default()),
        None => (" messages ".to_string(), String::new(), Style::default()),
    };
    let note = Paragraph::new(text)
        .style(style)
        .block(Block::bordered().padding(LEFT_PAD).title(title));
    frame.render_widget(note, chunks[3]);

    // Files | history
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[4]);

    // Files already in the history get a marker.
    let history_store = player.history();
    let files: Vec<String> = app
        .files
        .iter()
        .map(|f| {
            let mark = if history_store.contains(&f.path) { "• " } else { "" };
            match f.duration {
                Some(d) => format!("{mark}{} [{}]", f.name, format_mmss(d)),
                None => format!("{mark}{}", f.name),
            }
        })
        .collect();
    render_list(
        frame,
        body[0],
        " files ",
        files,
        app.file_selected,
        app.focus == Focus::Files,
    );

    let history: Vec<String> = history_store
        .entries()
        .map(|e| format!("{} ({})", e.name, e.last_played_label()))
        .collect();
    render_list(
        frame,
        body[1],
        " history ",
        history,
        app.history_selected,
        app.focus == Focus::History,
    );

    if app.confirm_clear {
        let popup_area = centered_rect_sized(44, 5, chunks[4]);
        frame.render_widget(Clear, popup_area);
        let confirm = Paragraph::new("Clear the play history? [y/n]")
            .bold()
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" confirm "))
            .wrap(Wrap { trim: true });
        frame.render_widget(confirm, popup_area);
    }

    let controls_title = if player.transport_enabled() {
        " controls "
    } else {
        " controls (open a file to play) "
    };
    let footer = Paragraph::new(controls_text(settings.playback.seek_step_percent))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(controls_title)
                .padding(LEFT_PAD),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);
}
