//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use choreo::checkpoints::format_time;
use choreo::config::{ControlsSettings, UiSettings};
use choreo::playback::PlaybackState;

use crate::app::{App, InputMode};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("s".to_string(), "stop".to_string());
    map.insert("a".to_string(), "add checkpoint".to_string());
    map.insert("j/k".to_string(), "select".to_string());
    map.insert("enter".to_string(), "jump".to_string());
    map.insert("x".to_string(), "remove".to_string());
    map.insert("R".to_string(), "rename".to_string());
    // H/L is filled dynamically from config.
    map.insert("0-9".to_string(), "seek to tenths".to_string());
    map.insert("o".to_string(), "open file".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "space/p", "s", "H/L", "0-9", "a", "j/k", "enter", "x", "R", "o", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

fn state_label(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Idle => "Idle",
        PlaybackState::Loaded => "Paused",
        PlaybackState::Playing => "Playing",
        PlaybackState::Completed => "Finished",
    }
}

/// Build the status line: loading file, or song, time and state.
fn status_text(app: &App) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(name) = &app.track_name {
        parts.push(format!(
            "Song: {} [{} / {}]",
            name,
            format_time(app.position),
            format_time(app.duration)
        ));
        parts.push(state_label(app.state).to_string());
    } else {
        parts.push("No track loaded (o opens a file)".to_string());
    }

    if let Some(file) = &app.loading {
        parts.push(format!("Loading: {}", file));
    }

    parts.join(" • ")
}

fn checkpoint_items(app: &App) -> Vec<ListItem<'_>> {
    app.checkpoints
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if app.duration > 0.0 {
                ListItem::new(format!(
                    "{:>2}. {}  @ {}",
                    i + 1,
                    c.label,
                    format_time(c.progress * app.duration)
                ))
            } else {
                ListItem::new(format!("{:>2}. {}", i + 1, c.label))
            }
        })
        .collect()
}

/// The message line, replaced by the line editor while typing.
fn message_line(app: &App) -> Paragraph<'_> {
    match app.input_mode {
        InputMode::Rename { index } => {
            Paragraph::new(format!("rename #{}: {}_", index + 1, app.input)).bold()
        }
        InputMode::Open => Paragraph::new(format!("open: {}_", app.input)).bold(),
        InputMode::Normal => match &app.message {
            Some(m) if m.is_error => Paragraph::new(m.text.as_str()).fg(Color::Red),
            Some(m) => Paragraph::new(m.text.as_str()),
            None => Paragraph::new(""),
        },
    }
}

fn padded(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Map a click at `(column, row)` to a seek fraction when it hits the bar.
///
/// `bar` is the bordered seek-bar area returned by `draw`. Columns on the
/// border clamp to the ends of the bar.
pub fn seek_fraction(bar: Rect, column: u16, row: u16) -> Option<f64> {
    if bar.width < 3 || row < bar.y || row >= bar.y + bar.height {
        return None;
    }
    if column < bar.x || column >= bar.x + bar.width {
        return None;
    }
    let inner_x = bar.x + 1;
    let inner_width = bar.width - 2;
    let offset = column.saturating_sub(inner_x).min(inner_width);
    Some(f64::from(offset) / f64::from(inner_width))
}

/// Render the entire UI into `frame`. Returns the seek-bar area for mouse hits.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());
    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" choreo ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(app)).block(padded(" status "));
    frame.render_widget(status, chunks[1]);

    // Seek bar
    let ratio = if app.progress.is_finite() {
        app.progress.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" position "))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ratio)
        .label(format!(
            "{} / {}",
            format_time(app.position),
            format_time(app.duration)
        ));
    frame.render_widget(gauge, chunks[2]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[3]);

    let list = List::new(checkpoint_items(app))
        .block(Block::default().borders(Borders::ALL).title(" checkpoints "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if app.has_checkpoints() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, body[0], &mut state);

    let titles: Vec<ListItem> = app
        .titles
        .iter()
        .map(|t| ListItem::new(t.as_str()))
        .collect();
    let titles = List::new(titles).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" previous titles "),
    );
    frame.render_widget(titles, body[1]);

    frame.render_widget(message_line(app).block(padded(" message ")), chunks[4]);

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);

    chunks[2]
}
