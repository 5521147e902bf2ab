//! Checkpoint values and their persisted layout.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current layout version written by this crate.
pub const SCHEMA_VERSION: u32 = 1;

/// A bookmark inside a track.
///
/// `progress` is a fraction of the duration rather than seconds, so it stays
/// meaningful if the same song decodes to a slightly different length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub label: String,
    pub progress: f64,
}

impl Checkpoint {
    /// Checkpoint at `position` seconds, labelled with its `MM:SS` time.
    pub fn at(position: f64, duration: f64) -> Self {
        let progress = if duration > 0.0 && position.is_finite() {
            (position / duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            label: format_time(position),
            progress,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.progress.is_finite() && (0.0..=1.0).contains(&self.progress)
    }
}

/// Format seconds as `MM:SS`, truncating partial seconds.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct StoredCheckpoints {
    pub version: u32,
    pub checkpoints: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct StoredTitles {
    pub version: u32,
    pub titles: Vec<Value>,
}

/// Validate a stored checkpoint document.
///
/// Accepts the versioned object as well as the bare array written before
/// the layout had a version. Invalid entries are dropped one by one.
pub(super) fn decode_checkpoints(value: Value) -> Vec<Checkpoint> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(_) => match serde_json::from_value::<StoredCheckpoints>(value) {
            Ok(doc) if doc.version == SCHEMA_VERSION => doc.checkpoints,
            Ok(doc) => {
                log::warn!(
                    "ignoring checkpoints stored with unknown layout version {}",
                    doc.version
                );
                return Vec::new();
            }
            Err(e) => {
                log::warn!("ignoring malformed checkpoint document: {}", e);
                return Vec::new();
            }
        },
        other => {
            log::warn!("ignoring checkpoint document of unexpected shape: {}", other);
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Checkpoint>(entry) {
            Ok(c) if c.is_valid() => Some(c),
            Ok(c) => {
                log::warn!("dropping checkpoint {:?} with progress {}", c.label, c.progress);
                None
            }
            Err(e) => {
                log::warn!("dropping malformed checkpoint: {}", e);
                None
            }
        })
        .collect()
}

pub(super) fn encode_checkpoints(checkpoints: &[Checkpoint]) -> Value {
    let doc = StoredCheckpoints {
        version: SCHEMA_VERSION,
        checkpoints: checkpoints
            .iter()
            .filter_map(|c| serde_json::to_value(c).ok())
            .collect(),
    };
    serde_json::to_value(doc).unwrap_or(Value::Null)
}

pub(super) fn decode_titles(value: Value) -> Vec<String> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(_) => match serde_json::from_value::<StoredTitles>(value) {
            Ok(doc) if doc.version == SCHEMA_VERSION => doc.titles,
            Ok(doc) => {
                log::warn!("ignoring titles stored with unknown layout version {}", doc.version);
                return Vec::new();
            }
            Err(e) => {
                log::warn!("ignoring malformed title history: {}", e);
                return Vec::new();
            }
        },
        _ => return Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
        .collect()
}

pub(super) fn encode_titles(titles: &[String]) -> Value {
    let doc = StoredTitles {
        version: SCHEMA_VERSION,
        titles: titles.iter().cloned().map(Value::String).collect(),
    };
    serde_json::to_value(doc).unwrap_or(Value::Null)
}
