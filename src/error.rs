//! Error types shared by the player core.
//!
//! Nothing in the core is fatal: callers turn these into status messages or
//! ignore them, the player itself never panics on them.

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChoreoError {
    /// The file picker was dismissed without a selection.
    #[error("no file selected")]
    NoFileSelected,

    /// The selected file could not be read or decoded as audio.
    #[error("could not decode audio: {0}")]
    Decode(String),

    /// A playback command arrived before any track was loaded.
    #[error("no track loaded")]
    NoTrackLoaded,

    /// The key-value persistence backend could not be read or written.
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    /// A checkpoint index outside the current list.
    #[error("checkpoint index {index} out of range (have {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// No audio device could be opened.
    #[error("audio output error: {0}")]
    AudioOutput(String),
}

impl ChoreoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChoreoError::NoFileSelected => ErrorKind::NoFileSelected,
            ChoreoError::Decode(_) => ErrorKind::Decode,
            ChoreoError::NoTrackLoaded => ErrorKind::NoTrackLoaded,
            ChoreoError::PersistenceUnavailable(_) => ErrorKind::PersistenceUnavailable,
            ChoreoError::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            ChoreoError::AudioOutput(_) => ErrorKind::AudioOutput,
        }
    }
}

/// Payload-free error category handed to observers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    NoFileSelected,
    Decode,
    NoTrackLoaded,
    PersistenceUnavailable,
    IndexOutOfRange,
    AudioOutput,
}

impl ErrorKind {
    /// Whether the UI should present this as a warning rather than an error.
    pub fn is_warning(self) -> bool {
        matches!(self, ErrorKind::NoTrackLoaded | ErrorKind::NoFileSelected)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::NoFileSelected => "no file selected",
            ErrorKind::Decode => "decode error",
            ErrorKind::NoTrackLoaded => "no track loaded",
            ErrorKind::PersistenceUnavailable => "storage unavailable",
            ErrorKind::IndexOutOfRange => "invalid checkpoint",
            ErrorKind::AudioOutput => "audio output error",
        };
        write!(f, "{}", label)
    }
}

pub type Result<T> = std::result::Result<T, ChoreoError>;
