//! Core of the choreo player: a single-track audio player with
//! position checkpoints, for rehearsing choreographies.
//!
//! The terminal front-end in `main.rs` drives a [`session::Session`]; all
//! time comes from an injected [`clock::Clock`] and all sound from an
//! injected [`audio::AudioOutput`], so the core runs headless in tests.

pub mod audio;
pub mod checkpoints;
pub mod clock;
pub mod config;
pub mod error;
pub mod loader;
pub mod playback;
pub mod session;
pub mod storage;

#[cfg(test)]
mod test_support;
