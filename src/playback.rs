//! Playback state machine, position model and the frame-driven tracker.

mod engine;
mod position;
mod tracker;

pub use engine::{EngineEvent, FrameReport, PlaybackEngine, PlaybackState};
pub use position::PositionModel;
pub use tracker::PositionTracker;

#[cfg(test)]
mod tests;
