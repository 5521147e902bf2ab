//! The playback state machine.

use std::collections::VecDeque;

use crate::audio::{ActiveVoice, AudioOutput, Track};
use crate::clock::Clock;
use crate::error::{ChoreoError, Result};

use super::position::PositionModel;

/// The playback state of the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No track loaded.
    #[default]
    Idle,
    /// Track loaded, not playing.
    Loaded,
    /// Track loaded and a voice is running.
    Playing,
    /// Track played to its end; position is pinned at the duration.
    Completed,
}

/// Notifications queued by the engine for whoever drives it.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A new track replaced the previous one.
    Loaded { name: String, duration: f64 },
    /// The state machine moved to a different state.
    StateChanged(PlaybackState),
    /// Playback reached the end of the track.
    Completed,
}

/// What one frame of the render loop reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub position: f64,
    pub progress: f64,
    pub is_complete: bool,
}

/// Owns the loaded track and its single live voice.
///
/// All reads of the position are derived from a `PositionModel` and the
/// injected clock, clamped into `[0, duration]`.
pub struct PlaybackEngine<C: Clock, O: AudioOutput> {
    clock: C,
    output: O,
    track: Option<Track>,
    voice: Option<ActiveVoice<O::Voice>>,
    state: PlaybackState,
    position: PositionModel,
    events: VecDeque<EngineEvent>,
}

impl<C: Clock, O: AudioOutput> PlaybackEngine<C, O> {
    pub fn new(clock: C, output: O) -> Self {
        Self {
            clock,
            output,
            track: None,
            voice: None,
            state: PlaybackState::Idle,
            position: PositionModel::default(),
            events: VecDeque::new(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    /// Duration of the loaded track, 0 when idle.
    pub fn duration(&self) -> f64 {
        self.track.as_ref().map(Track::duration).unwrap_or(0.0)
    }

    /// Current position in seconds, within `[0, duration]`.
    pub fn position(&self) -> f64 {
        let duration = self.duration();
        if duration <= 0.0 {
            return 0.0;
        }
        let raw = self.position.position_at(self.clock.now());
        if raw.is_nan() {
            0.0
        } else {
            raw.clamp(0.0, duration)
        }
    }

    /// Position as a fraction of the duration; 0 without a track.
    pub fn progress(&self) -> f64 {
        let duration = self.duration();
        if duration > 0.0 {
            (self.position() / duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn snapshot(&self) -> FrameReport {
        FrameReport {
            position: self.position(),
            progress: self.progress(),
            is_complete: self.state == PlaybackState::Completed,
        }
    }

    pub fn is_voice_active(&self) -> bool {
        self.voice.is_some()
    }

    /// Take the queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain(..).collect()
    }

    /// Replace the current track. Valid from any state.
    pub fn load(&mut self, track: Track) {
        self.release_voice();
        log::info!("loading {:?} ({:.2}s)", track.name(), track.duration());
        self.events.push_back(EngineEvent::Loaded {
            name: track.name().to_string(),
            duration: track.duration(),
        });
        self.track = Some(track);
        self.position = PositionModel::frozen(0.0);
        self.set_state(PlaybackState::Loaded);
    }

    /// Start or resume. Replays from the start after completion.
    pub fn play(&mut self) -> Result<()> {
        if self.track.is_none() {
            return Err(ChoreoError::NoTrackLoaded);
        }
        let offset = match self.state {
            PlaybackState::Playing => return Ok(()),
            PlaybackState::Completed => 0.0,
            PlaybackState::Idle | PlaybackState::Loaded => self.position(),
        };
        self.start_voice(offset);
        self.set_state(PlaybackState::Playing);
        Ok(())
    }

    /// Freeze at the current position. No-op unless playing.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let position = self.position();
        self.release_voice();
        self.position = PositionModel::frozen(position);
        self.set_state(PlaybackState::Loaded);
    }

    /// Stop and rewind to the start. No-op when idle.
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Idle {
            return;
        }
        self.release_voice();
        self.position = PositionModel::frozen(0.0);
        self.set_state(PlaybackState::Loaded);
    }

    /// Jump to `fraction` of the track, keeping the play/pause status.
    pub fn seek(&mut self, fraction: f64) -> Result<()> {
        if self.track.is_none() {
            return Err(ChoreoError::NoTrackLoaded);
        }
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let target = fraction * self.duration();
        if self.state == PlaybackState::Playing {
            self.start_voice(target);
        } else {
            self.position = PositionModel::frozen(target);
            self.set_state(PlaybackState::Loaded);
        }
        log::debug!("seek to {:.2}s ({:.3})", target, fraction);
        Ok(())
    }

    /// Advance the frame; detects the end of the track while playing.
    pub fn tick(&mut self) -> FrameReport {
        if self.state == PlaybackState::Playing {
            let duration = self.duration();
            let raw = self.position.position_at(self.clock.now());
            if raw >= duration {
                self.release_voice();
                self.position = PositionModel::frozen(duration);
                self.set_state(PlaybackState::Completed);
                self.events.push_back(EngineEvent::Completed);
            }
        }
        self.snapshot()
    }

    fn start_voice(&mut self, offset: f64) {
        // The old voice must be silent before the new one makes a sound.
        self.release_voice();
        let Some(track) = self.track.as_ref() else {
            return;
        };
        let voice = self.output.create_voice(track);
        self.voice = Some(ActiveVoice::start(voice, offset));
        self.position = PositionModel::running_from(self.clock.now(), offset);
    }

    fn release_voice(&mut self) {
        if let Some(voice) = self.voice.take() {
            log::trace!("stopping voice started at {:.2}s", voice.offset());
            voice.stop();
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            log::debug!("playback {:?} -> {:?}", self.state, state);
            self.state = state;
            self.events.push_back(EngineEvent::StateChanged(state));
        }
    }
}
