//! Turning the bytes of a selected file into a `Track`.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::Accessor;
use rodio::{Decoder, Source};

use crate::error::{ChoreoError, Result};

use super::types::{PcmBuffer, Track};

/// Decodes raw file bytes. Runs on a worker thread, hence `Send + Sync`.
pub trait TrackDecoder: Send + Sync {
    fn decode(&self, file_name: &str, bytes: Vec<u8>) -> Result<Track>;
}

/// Full in-memory decode through rodio's symphonia-backed `Decoder`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RodioDecoder;

impl TrackDecoder for RodioDecoder {
    fn decode(&self, file_name: &str, bytes: Vec<u8>) -> Result<Track> {
        let start = Instant::now();
        let name = display_name(file_name, &bytes);

        let decoder = Decoder::new(Cursor::new(bytes))
            .map_err(|e| ChoreoError::Decode(format!("{file_name}: {e}")))?;
        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        let samples: Vec<f32> = decoder.collect();
        log::debug!(
            "decoded {} samples ({} ch @ {} Hz) from {:?}",
            samples.len(),
            channels,
            sample_rate,
            file_name
        );

        let pcm = PcmBuffer::new(samples, channels, sample_rate);
        let track = Track::from_pcm(name, pcm)?;
        log::info!(
            "loaded {:?} ({:.1}s) in {:?}",
            track.name(),
            track.duration(),
            start.elapsed()
        );
        Ok(track)
    }
}

/// "Artist - Title" from the tags when present, else the file stem.
pub fn display_name(file_name: &str, bytes: &[u8]) -> String {
    let fallback = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(file_name)
        .to_string();

    let tagged = match Probe::new(Cursor::new(bytes))
        .guess_file_type()
        .map_err(lofty::error::LoftyError::from)
        .and_then(|p| p.read())
    {
        Ok(t) => t,
        Err(e) => {
            log::debug!("no readable tags in {:?}: {}", file_name, e);
            return fallback;
        }
    };

    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        return fallback;
    };

    let title = tag
        .title()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let artist = tag
        .artist()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty());

    match (artist, title) {
        (Some(a), Some(t)) => format!("{} - {}", a, t),
        (None, Some(t)) => t,
        _ => fallback,
    }
}
