use crate::audio::AudioOutput;
use crate::clock::Clock;

use super::engine::{FrameReport, PlaybackEngine, PlaybackState};

/// Self-rescheduling frame callback.
///
/// `schedule` arms it for the next frame. Each `on_frame` consumes the arm
/// and re-arms only while the engine is still playing, so leaving `Playing`
/// ends the loop without any cancel handle.
#[derive(Debug, Default)]
pub struct PositionTracker {
    scheduled: bool,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self) {
        self.scheduled = true;
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Run one frame if armed. Returns the report to render.
    pub fn on_frame<C: Clock, O: AudioOutput>(
        &mut self,
        engine: &mut PlaybackEngine<C, O>,
    ) -> Option<FrameReport> {
        if !self.scheduled {
            return None;
        }
        self.scheduled = false;

        let report = if engine.state() == PlaybackState::Playing {
            engine.tick()
        } else {
            engine.snapshot()
        };

        if engine.state() == PlaybackState::Playing {
            self.scheduled = true;
        }
        Some(report)
    }
}
