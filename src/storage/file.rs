use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{ChoreoError, Result};

use super::KeyValueStore;

/// All keys in one JSON object on disk.
///
/// Each `set` rewrites the whole file through a sibling temp file and a
/// rename, so a crash never leaves a half-written document behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(unavailable(&self.path, e)),
        };
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(ChoreoError::PersistenceUnavailable(format!(
                "{}: top level is not an object",
                self.path.display()
            ))),
            Err(e) => Err(unavailable(&self.path, e)),
        }
    }

    fn write_all(&self, map: Map<String, Value>) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| unavailable(dir, e))?;
        }
        let text = serde_json::to_string_pretty(&Value::Object(map))
            .map_err(|e| unavailable(&self.path, e))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(|e| unavailable(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| unavailable(&self.path, e))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        // A corrupt file is reported rather than overwritten, other keys live there too.
        let mut map = self.read_all()?;
        map.insert(key.to_string(), value);
        self.write_all(map)
    }
}

fn unavailable(path: &Path, e: impl std::fmt::Display) -> ChoreoError {
    ChoreoError::PersistenceUnavailable(format!("{}: {}", path.display(), e))
}
