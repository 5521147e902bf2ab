//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds what the player last
//! reported, plus the checkpoint selection and input state.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
