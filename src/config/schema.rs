use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::checkpoints::CheckpointScope;
use crate::session::SessionOptions;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/choreo/config.toml` or `~/.config/choreo/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CHOREO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            checkpoint_scope: self.storage.checkpoint_scope,
            title_history_limit: self.storage.title_history_limit,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    /// JSON file holding checkpoints and recent titles.
    /// Unset means `$XDG_DATA_HOME/choreo/storage.json`.
    pub data_file: Option<PathBuf>,
    /// `global` keeps one checkpoint list for every song, `per-track` one per title.
    pub checkpoint_scope: CheckpointScope,
    /// How many recently loaded titles to remember.
    pub title_history_limit: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_file: None,
            checkpoint_scope: CheckpointScope::Global,
            title_history_limit: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Delay between position updates while playing (milliseconds).
    pub frame_interval_ms: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            frame_interval_ms: 16,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ choreo: count it in ~ ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`. `RUST_LOG` wins when set.
    pub level: String,
    /// Log file. Unset means `choreo.log` next to the data file.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
