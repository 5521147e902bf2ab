//! Application model types: `App`, `InputMode` and `StatusMessage`.
//!
//! The `App` struct mirrors what the session last reported and holds the
//! checkpoint selection and line editor used by the UI and runtime.

use choreo::checkpoints::Checkpoint;
use choreo::error::ErrorKind;
use choreo::playback::PlaybackState;
use choreo::session::PlayerObserver;

/// What typed characters currently go to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Editing the label of the checkpoint at `index`.
    Rename { index: usize },
    /// Typing the path of a file to open.
    Open,
}

/// One line shown under the checkpoint lists.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// The main application model.
#[derive(Debug, Default)]
pub struct App {
    pub track_name: Option<String>,
    pub duration: f64,
    pub position: f64,
    pub progress: f64,
    pub state: PlaybackState,

    pub checkpoints: Vec<Checkpoint>,
    pub titles: Vec<String>,
    pub selected: usize,

    /// File currently being decoded, if any.
    pub loading: Option<String>,
    pub message: Option<StatusMessage>,

    pub input_mode: InputMode,
    pub input: String,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_checkpoints(&self) -> bool {
        !self.checkpoints.is_empty()
    }

    /// Move selection to the next checkpoint (wraps around).
    pub fn next(&mut self) {
        if self.checkpoints.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.checkpoints.len();
    }

    /// Move selection to the previous checkpoint (wraps around).
    pub fn prev(&mut self) {
        if self.checkpoints.is_empty() {
            return;
        }
        self.selected = if self.selected == 0 {
            self.checkpoints.len() - 1
        } else {
            self.selected - 1
        };
    }

    pub fn selected_checkpoint(&self) -> Option<&Checkpoint> {
        self.checkpoints.get(self.selected)
    }

    /// Start editing the selected checkpoint's label, prefilled with the current one.
    pub fn begin_rename(&mut self) {
        let Some(checkpoint) = self.selected_checkpoint() else {
            return;
        };
        self.input = checkpoint.label.clone();
        self.input_mode = InputMode::Rename {
            index: self.selected,
        };
    }

    pub fn begin_open(&mut self) {
        self.input.clear();
        self.input_mode = InputMode::Open;
    }

    pub fn is_editing(&self) -> bool {
        self.input_mode != InputMode::Normal
    }

    pub fn push_input_char(&mut self, c: char) {
        if self.is_editing() {
            self.input.push(c);
        }
    }

    pub fn pop_input_char(&mut self) {
        self.input.pop();
    }

    pub fn cancel_input(&mut self) {
        self.input.clear();
        self.input_mode = InputMode::Normal;
    }

    /// Leave input mode, handing back what was being edited and the typed text.
    pub fn take_input(&mut self) -> Option<(InputMode, String)> {
        if !self.is_editing() {
            return None;
        }
        let mode = std::mem::take(&mut self.input_mode);
        Some((mode, std::mem::take(&mut self.input)))
    }

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn set_warning(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }

    /// Drop the loading indicator once no decode is pending.
    pub fn sync_loading(&mut self, is_loading: bool) {
        if !is_loading {
            self.loading = None;
        }
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.checkpoints.len() {
            self.selected = self.checkpoints.len().saturating_sub(1);
        }
    }
}

impl PlayerObserver for App {
    fn on_file_loaded(&mut self, name: &str, duration: f64) {
        self.loading = None;
        self.track_name = Some(name.to_string());
        self.duration = duration;
        self.position = 0.0;
        self.progress = 0.0;
        self.set_info(format!("loaded {name}"));
    }

    fn on_position_tick(&mut self, position: f64, progress: f64, is_complete: bool) {
        self.position = position;
        self.progress = progress;
        if is_complete {
            self.set_info("end of track");
        }
    }

    fn on_checkpoints_changed(&mut self, checkpoints: &[Checkpoint]) {
        self.checkpoints = checkpoints.to_vec();
        self.clamp_selection();
    }

    fn on_error(&mut self, kind: ErrorKind, message: &str) {
        self.message = Some(StatusMessage {
            text: message.to_string(),
            is_error: !kind.is_warning(),
        });
    }

    fn on_titles_changed(&mut self, titles: &[String]) {
        self.titles = titles.to_vec();
    }

    fn on_state_changed(&mut self, state: PlaybackState) {
        self.state = state;
    }

    fn on_loading(&mut self, file_name: &str) {
        self.loading = Some(file_name.to_string());
    }
}
