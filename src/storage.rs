//! Key-value persistence with whole-value reads and writes.
//!
//! Values are JSON documents; every `set` replaces the stored document for
//! its key. Callers own the schema of what they store.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::{MemoryStore, UnavailableStore};

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use crate::error::Result;

/// Key of the persisted checkpoint list.
pub const CHECKPOINTS_KEY: &str = "_choreo_checkpoints_";
/// Key of the recently loaded titles.
pub const TITLES_KEY: &str = "_choreo_titles_";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        (**self).set(key, value)
    }
}

/// One backend shared by several stores on the player thread.
impl<S: KeyValueStore> KeyValueStore for Rc<RefCell<S>> {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        self.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.borrow_mut().set(key, value)
    }
}
