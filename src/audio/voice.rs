//! One-shot playback handles.
//!
//! A backend hands out fresh voices; `ActiveVoice` is the only way to start
//! one and consumes it on stop, so a voice can neither restart nor be stopped
//! twice.

use super::types::Track;

/// A backend-specific handle that renders one track from one offset.
pub trait Voice {
    /// Begin output at `offset` seconds into the track.
    fn start(&mut self, offset: f64);
    /// Silence the output. Called at most once, after `start`.
    fn stop(&mut self);
}

/// Factory for voices bound to a track.
pub trait AudioOutput {
    type Voice: Voice;

    fn create_voice(&self, track: &Track) -> Self::Voice;
}

/// A voice that has been started and not yet stopped.
#[derive(Debug)]
pub struct ActiveVoice<V: Voice> {
    inner: V,
    offset: f64,
}

impl<V: Voice> ActiveVoice<V> {
    pub fn start(mut voice: V, offset: f64) -> Self {
        voice.start(offset);
        Self {
            inner: voice,
            offset,
        }
    }

    /// Offset the voice was started at.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Stop and drop the voice.
    pub fn stop(mut self) {
        self.inner.stop();
    }
}
