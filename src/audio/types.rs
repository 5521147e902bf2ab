//! Decoded audio data and the immutable `Track` built from it.

use std::sync::Arc;

use crate::error::{ChoreoError, Result};

/// Interleaved PCM samples shared between the engine and live voices.
#[derive(Debug, Clone)]
pub struct PcmBuffer {
    samples: Arc<[f32]>,
    channels: u16,
    sample_rate: u32,
}

impl PcmBuffer {
    pub fn new(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            channels: channels.max(1),
            sample_rate,
        }
    }

    pub fn samples(&self) -> &Arc<[f32]> {
        &self.samples
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of whole frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Length in seconds, or 0 when the sample rate is unknown.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frames() as f64 / self.sample_rate as f64
        }
    }

    /// Interleaved sample index of the frame at `seconds`, clamped to the buffer.
    pub fn sample_index_at(&self, seconds: f64) -> usize {
        if !seconds.is_finite() || seconds <= 0.0 {
            return 0;
        }
        let frame = (seconds * self.sample_rate as f64) as usize;
        frame
            .min(self.frames())
            .saturating_mul(self.channels as usize)
    }
}

impl Default for PcmBuffer {
    fn default() -> Self {
        Self::new(Vec::new(), 2, 44_100)
    }
}

/// A decoded song: audio, duration and the name shown to the user.
///
/// Tracks are never mutated after construction; loading a new file replaces
/// the whole value.
#[derive(Debug, Clone)]
pub struct Track {
    name: String,
    duration: f64,
    pcm: PcmBuffer,
}

impl Track {
    pub fn new(name: impl Into<String>, duration: f64, pcm: PcmBuffer) -> Result<Self> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(ChoreoError::Decode(format!(
                "invalid track duration: {duration}"
            )));
        }
        Ok(Self {
            name: name.into(),
            duration,
            pcm,
        })
    }

    /// Build a track whose duration is taken from the PCM length.
    pub fn from_pcm(name: impl Into<String>, pcm: PcmBuffer) -> Result<Self> {
        let duration = pcm.duration_seconds();
        Self::new(name, duration, pcm)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn pcm(&self) -> &PcmBuffer {
        &self.pcm
    }
}
