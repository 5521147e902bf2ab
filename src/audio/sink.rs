//! `rodio` backend: each voice is its own `Sink` fed from the shared PCM.
//!
//! The helper here prepares a paused `Sink` positioned at the requested
//! offset; starting the voice resumes it.

use std::sync::Arc;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink, Source};

use crate::error::{ChoreoError, Result};

use super::types::{PcmBuffer, Track};
use super::voice::{AudioOutput, Voice};

/// Owns the output stream for the lifetime of the player.
pub struct RodioOutput {
    stream: OutputStream,
}

impl RodioOutput {
    pub fn open_default() -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| ChoreoError::AudioOutput(format!("no audio output device: {e}")))?;
        // rodio logs to stderr when the stream is dropped, which garbles the terminal.
        stream.log_on_drop(false);
        Ok(Self { stream })
    }
}

impl AudioOutput for RodioOutput {
    type Voice = SinkVoice;

    fn create_voice(&self, track: &Track) -> SinkVoice {
        SinkVoice {
            sink: Sink::connect_new(self.stream.mixer()),
            pcm: track.pcm().clone(),
        }
    }
}

pub struct SinkVoice {
    sink: Sink,
    pcm: PcmBuffer,
}

impl Voice for SinkVoice {
    fn start(&mut self, offset: f64) {
        self.sink.pause();
        self.sink.append(TrackSource::starting_at(&self.pcm, offset));
        self.sink.play();
    }

    fn stop(&mut self) {
        self.sink.stop();
    }
}

/// Iterates the shared PCM from a frame-aligned start index.
pub struct TrackSource {
    samples: Arc<[f32]>,
    cursor: usize,
    channels: u16,
    sample_rate: u32,
}

impl TrackSource {
    pub fn starting_at(pcm: &PcmBuffer, offset: f64) -> Self {
        Self {
            samples: Arc::clone(pcm.samples()),
            cursor: pcm.sample_index_at(offset),
            channels: pcm.channels(),
            sample_rate: pcm.sample_rate(),
        }
    }
}

impl Iterator for TrackSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.samples.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.samples.len().saturating_sub(self.cursor);
        (remaining, Some(remaining))
    }
}

impl Source for TrackSource {
    fn current_span_len(&self) -> Option<usize> {
        Some(self.samples.len().saturating_sub(self.cursor))
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        if self.sample_rate == 0 {
            return None;
        }
        let frames = self.samples.len() / self.channels.max(1) as usize;
        Some(Duration::from_secs_f64(
            frames as f64 / self.sample_rate as f64,
        ))
    }
}
