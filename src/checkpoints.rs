//! Checkpoints: named positions inside a track, and the title history.
//!
//! Both are stored as versioned JSON documents through a `KeyValueStore`.

mod model;
mod store;
mod titles;

pub use model::{Checkpoint, SCHEMA_VERSION, format_time};
pub use store::{CheckpointScope, CheckpointStore};
pub use titles::TitleHistory;
