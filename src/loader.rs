//! Background decoding with a generation guard.
//!
//! Every selection gets a ticket with a larger generation than the last one.
//! Decodes are never cancelled; a finished decode is only applied if its
//! ticket is still the newest, anything older is dropped on arrival.

use std::fs;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crate::audio::{Track, TrackDecoder};
use crate::error::{ChoreoError, Result};

/// A file picked by the user, read fully into memory.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn read(path: &Path) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    file_name: String,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// A decode that finished, successfully or not.
pub struct FinishedLoad {
    pub ticket: LoadTicket,
    pub result: Result<Track>,
}

pub struct Loader {
    decoder: Arc<dyn TrackDecoder>,
    latest: u64,
    settled: u64,
    tx: Sender<FinishedLoad>,
    rx: Receiver<FinishedLoad>,
}

impl Loader {
    pub fn new(decoder: Arc<dyn TrackDecoder>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            decoder,
            latest: 0,
            settled: 0,
            tx,
            rx,
        }
    }

    /// Issue the next ticket, superseding every earlier one.
    pub fn begin(&mut self, file_name: &str) -> LoadTicket {
        self.latest += 1;
        LoadTicket {
            generation: self.latest,
            file_name: file_name.to_string(),
        }
    }

    /// Decode `file` on a worker thread; the result arrives through `try_recv`.
    pub fn spawn(&mut self, file: SelectedFile) -> LoadTicket {
        let ticket = self.begin(&file.name);
        let decoder = Arc::clone(&self.decoder);
        let tx = self.tx.clone();
        let for_worker = ticket.clone();
        log::debug!(
            "decoding {:?} ({} bytes) as generation {}",
            file.name,
            file.bytes.len(),
            ticket.generation
        );
        thread::spawn(move || {
            let SelectedFile { name, bytes } = file;
            let result = panic::catch_unwind(AssertUnwindSafe(|| decoder.decode(&name, bytes)))
                .unwrap_or_else(|_| Err(ChoreoError::Decode(format!("{name}: decoder panicked"))));
            // The receiver only goes away when the player shuts down.
            let _ = tx.send(FinishedLoad {
                ticket: for_worker,
                result,
            });
        });
        ticket
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.latest
    }

    /// Record that `ticket` finished. Returns whether its result should be applied.
    pub fn settle(&mut self, ticket: &LoadTicket) -> bool {
        if !self.is_current(ticket) {
            log::info!(
                "discarding superseded decode of {:?} (generation {} < {})",
                ticket.file_name,
                ticket.generation,
                self.latest
            );
            return false;
        }
        self.settled = ticket.generation;
        true
    }

    /// Whether the newest ticket is still waiting for its decode.
    pub fn is_loading(&self) -> bool {
        self.settled < self.latest
    }

    pub fn try_recv(&self) -> Option<FinishedLoad> {
        self.rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<FinishedLoad> {
        self.rx.recv_timeout(timeout).ok()
    }
}
