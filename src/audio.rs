//! Audio data, voices and the rodio backend.
//!
//! `types` holds the decoded `Track`, `voice` the one-shot playback handle
//! contract, `sink` and `decode` the rodio implementations of both.

mod decode;
mod sink;
mod types;
mod voice;

pub use decode::{RodioDecoder, TrackDecoder, display_name};
pub use sink::{RodioOutput, SinkVoice, TrackSource};
pub use types::{PcmBuffer, Track};
pub use voice::{ActiveVoice, AudioOutput, Voice};
