use serde::{Deserialize, Serialize};

use crate::error::{ChoreoError, Result};
use crate::storage::{CHECKPOINTS_KEY, KeyValueStore};

use super::model::{Checkpoint, decode_checkpoints, encode_checkpoints, format_time};

/// Which key a checkpoint list is stored under.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckpointScope {
    /// One list shared by every song.
    #[default]
    #[serde(alias = "shared")]
    Global,
    /// One list per track name.
    #[serde(alias = "per_track", alias = "track")]
    PerTrack,
}

/// Ordered checkpoint list persisted through a `KeyValueStore`.
///
/// Every operation reads and writes the whole list. A failing backend reads
/// as an empty list and drops writes; errors never reach the caller. Every
/// returned list is what the backend holds afterwards.
pub struct CheckpointStore<S: KeyValueStore> {
    backend: S,
    scope: CheckpointScope,
    key: String,
}

impl<S: KeyValueStore> CheckpointStore<S> {
    pub fn new(backend: S, scope: CheckpointScope) -> Self {
        Self {
            backend,
            scope,
            key: CHECKPOINTS_KEY.to_string(),
        }
    }

    pub fn scope(&self) -> CheckpointScope {
        self.scope
    }

    /// Storage key currently in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Point the store at the list of `track_name`. Only matters per track.
    pub fn select_track(&mut self, track_name: &str) {
        self.key = match self.scope {
            CheckpointScope::Global => CHECKPOINTS_KEY.to_string(),
            CheckpointScope::PerTrack => format!("{}/{}", CHECKPOINTS_KEY, track_name),
        };
    }

    pub fn list(&self) -> Vec<Checkpoint> {
        match self.backend.get(&self.key) {
            Ok(Some(value)) => decode_checkpoints(value),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("checkpoints unavailable, showing none: {}", e);
                Vec::new()
            }
        }
    }

    /// Append a checkpoint at `position` and return the updated list.
    pub fn add(&mut self, position: f64, duration: f64) -> Vec<Checkpoint> {
        let mut checkpoints = self.list();
        let checkpoint = Checkpoint::at(position, duration);
        log::info!(
            "checkpoint {:?} at {:.3}",
            checkpoint.label,
            checkpoint.progress
        );
        checkpoints.push(checkpoint);
        self.commit(checkpoints)
    }

    pub fn remove(&mut self, index: usize) -> Result<Vec<Checkpoint>> {
        let mut checkpoints = self.list();
        if index >= checkpoints.len() {
            return Err(ChoreoError::IndexOutOfRange {
                index,
                len: checkpoints.len(),
            });
        }
        let removed = checkpoints.remove(index);
        log::info!("removed checkpoint {:?}", removed.label);
        Ok(self.commit(checkpoints))
    }

    /// Relabel a checkpoint.
    ///
    /// A blank label restores the `MM:SS` label when `duration` is known and
    /// leaves the list untouched otherwise.
    pub fn rename(
        &mut self,
        index: usize,
        label: &str,
        duration: Option<f64>,
    ) -> Result<Vec<Checkpoint>> {
        let mut checkpoints = self.list();
        let len = checkpoints.len();
        let Some(checkpoint) = checkpoints.get_mut(index) else {
            return Err(ChoreoError::IndexOutOfRange { index, len });
        };

        let label = label.trim();
        if label.is_empty() {
            match duration {
                Some(d) if d > 0.0 => checkpoint.label = format_time(checkpoint.progress * d),
                _ => return Ok(checkpoints),
            }
        } else {
            checkpoint.label = label.to_string();
        }
        Ok(self.commit(checkpoints))
    }

    pub fn clear(&mut self) -> Vec<Checkpoint> {
        self.commit(Vec::new())
    }

    /// Save `checkpoints`. Returns them when saved, else what is still stored.
    fn commit(&mut self, checkpoints: Vec<Checkpoint>) -> Vec<Checkpoint> {
        match self.backend.set(&self.key, encode_checkpoints(&checkpoints)) {
            Ok(()) => checkpoints,
            Err(e) => {
                log::warn!("could not save checkpoints: {}", e);
                self.list()
            }
        }
    }
}
