//! Fakes shared by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::audio::{AudioOutput, PcmBuffer, Track, Voice};

#[derive(Debug, Default)]
pub struct VoiceLog {
    pub created: usize,
    pub starts: Vec<f64>,
    pub stops: usize,
    /// Voices started and not yet stopped.
    pub live: usize,
    /// Highest number of simultaneously live voices ever seen.
    pub max_live: usize,
}

#[derive(Clone, Default)]
pub struct RecordingOutput {
    pub log: Rc<RefCell<VoiceLog>>,
}

pub struct RecordingVoice {
    log: Rc<RefCell<VoiceLog>>,
    started: bool,
    stopped: bool,
}

impl AudioOutput for RecordingOutput {
    type Voice = RecordingVoice;

    fn create_voice(&self, _track: &Track) -> RecordingVoice {
        self.log.borrow_mut().created += 1;
        RecordingVoice {
            log: self.log.clone(),
            started: false,
            stopped: false,
        }
    }
}

impl Voice for RecordingVoice {
    fn start(&mut self, offset: f64) {
        assert!(!self.started, "voice started twice");
        self.started = true;
        let mut log = self.log.borrow_mut();
        log.starts.push(offset);
        log.live += 1;
        log.max_live = log.max_live.max(log.live);
    }

    fn stop(&mut self) {
        assert!(self.started, "voice stopped before start");
        assert!(!self.stopped, "voice stopped twice");
        self.stopped = true;
        let mut log = self.log.borrow_mut();
        log.stops += 1;
        log.live -= 1;
    }
}

pub fn track(name: &str, duration: f64) -> Track {
    Track::new(name, duration, PcmBuffer::default()).unwrap()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
