use crate::storage::{KeyValueStore, TITLES_KEY};

use super::model::{decode_titles, encode_titles};

/// Recently loaded track names, newest first.
pub struct TitleHistory<S: KeyValueStore> {
    backend: S,
    limit: usize,
}

impl<S: KeyValueStore> TitleHistory<S> {
    pub fn new(backend: S, limit: usize) -> Self {
        Self {
            backend,
            limit: limit.max(1),
        }
    }

    pub fn list(&self) -> Vec<String> {
        match self.backend.get(TITLES_KEY) {
            Ok(Some(value)) => decode_titles(value),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("title history unavailable: {}", e);
                Vec::new()
            }
        }
    }

    /// Move `title` to the front, dropping older duplicates and the overflow.
    pub fn record(&mut self, title: &str) -> Vec<String> {
        let title = title.trim();
        let mut titles = self.list();
        if title.is_empty() {
            return titles;
        }
        titles.retain(|t| t != title);
        titles.insert(0, title.to_string());
        titles.truncate(self.limit);

        if let Err(e) = self.backend.set(TITLES_KEY, encode_titles(&titles)) {
            log::warn!("could not save title history: {}", e);
        }
        titles
    }
}
