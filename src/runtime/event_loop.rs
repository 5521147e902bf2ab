use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};

use choreo::audio::AudioOutput;
use choreo::clock::Clock;
use choreo::config;
use choreo::error::ChoreoError;
use choreo::loader::SelectedFile;
use choreo::session::{PlayerObserver, Session};
use choreo::storage::KeyValueStore;

use crate::app::{App, InputMode};
use crate::ui;

/// How long to wait for input when nothing is moving on screen.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Main terminal event loop: applies finished decodes, advances the position
/// tracker, draws and handles input. Returns `Ok(())` when shutdown is requested.
pub fn run<C: Clock, O: AudioOutput, S: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    session: &mut Session<C, O, S>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let frame_interval = Duration::from_millis(settings.controls.frame_interval_ms);

    loop {
        session.pump_loads(app);
        session.frame(app);
        app.sync_loading(session.is_loading());

        let mut seek_bar = Rect::default();
        terminal.draw(|f| seek_bar = ui::draw(f, app, &settings.ui, &settings.controls))?;

        let timeout = if session.wants_frame() || session.is_loading() {
            frame_interval
        } else {
            IDLE_POLL
        };

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key_event(key, settings, session, app) {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, seek_bar, session, app),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Read `path` and hand it to the session for decoding.
pub fn open_path<C: Clock, O: AudioOutput, S: KeyValueStore>(
    path: &Path,
    session: &mut Session<C, O, S>,
    app: &mut App,
) {
    match SelectedFile::read(path) {
        Ok(file) => {
            session.select_file(Some(file), app);
        }
        Err(e) => {
            let err = ChoreoError::Decode(format!("{}: {}", path.display(), e));
            log::error!("{}", err);
            app.on_error(err.kind(), &err.to_string());
        }
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_path(input: &str) -> Option<PathBuf> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(rest));
        }
    }
    Some(PathBuf::from(input))
}

fn handle_mouse_event<C: Clock, O: AudioOutput, S: KeyValueStore>(
    mouse: MouseEvent,
    seek_bar: Rect,
    session: &mut Session<C, O, S>,
    app: &mut App,
) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    if let Some(fraction) = ui::seek_fraction(seek_bar, mouse.column, mouse.row) {
        session.seek_to_fraction(fraction, app);
    }
}

/// Returns `true` when the user asked to quit.
fn handle_key_event<C: Clock, O: AudioOutput, S: KeyValueStore>(
    key: KeyEvent,
    settings: &config::Settings,
    session: &mut Session<C, O, S>,
    app: &mut App,
) -> bool {
    if app.is_editing() {
        match key.code {
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Backspace => app.pop_input_char(),
            KeyCode::Enter => match app.take_input() {
                Some((InputMode::Rename { index }, label)) => {
                    session.rename_checkpoint(index, &label, app);
                }
                Some((InputMode::Open, text)) => match expand_path(&text) {
                    Some(path) => open_path(&path, session, app),
                    None => {
                        session.select_file(None, app);
                    }
                },
                _ => {}
            },
            KeyCode::Char(c) => {
                if !c.is_control() {
                    app.push_input_char(c);
                }
            }
            _ => {}
        }
        return false;
    }

    let scrub = settings.controls.scrub_seconds as f64;
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('p') | KeyCode::Char(' ') => session.play_pause(app),
        KeyCode::Char('s') => session.stop(app),
        KeyCode::Char('L') => session.seek_by(scrub, app),
        KeyCode::Char('H') => session.seek_by(-scrub, app),
        KeyCode::Char(c @ '0'..='9') => {
            let tenths = f64::from(c.to_digit(10).unwrap_or(0));
            session.seek_to_fraction(tenths / 10.0, app);
        }
        KeyCode::Char('a') => {
            session.add_checkpoint(app);
            if app.has_checkpoints() {
                app.selected = app.checkpoints.len() - 1;
            }
        }
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => {
            if app.has_checkpoints() {
                session.jump_to_checkpoint(app.selected, app);
            }
        }
        KeyCode::Char('x') => {
            if app.has_checkpoints() {
                session.remove_checkpoint(app.selected, app);
            }
        }
        KeyCode::Char('R') => app.begin_rename(),
        KeyCode::Char('o') => app.begin_open(),
        KeyCode::Esc => app.clear_message(),
        _ => {}
    }

    false
}
