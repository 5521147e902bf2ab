use std::collections::HashMap;

use serde_json::Value;

use crate::error::{ChoreoError, Result};

use super::KeyValueStore;

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Stand-in used when no storage location can be resolved; every call fails.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<Value>> {
        Err(ChoreoError::PersistenceUnavailable(self.reason.clone()))
    }

    fn set(&mut self, _key: &str, _value: Value) -> Result<()> {
        Err(ChoreoError::PersistenceUnavailable(self.reason.clone()))
    }
}
