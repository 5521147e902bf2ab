//! The surface a front-end drives: commands in, observer callbacks out.
//!
//! A `Session` owns the engine, the frame tracker, the checkpoint and title
//! stores and the loader. It runs on one thread; only decoding leaves it.

mod observer;

pub use observer::PlayerObserver;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::audio::{AudioOutput, Track, TrackDecoder};
use crate::checkpoints::{Checkpoint, CheckpointScope, CheckpointStore, TitleHistory};
use crate::clock::Clock;
use crate::error::{ChoreoError, Result};
use crate::loader::{LoadTicket, Loader, SelectedFile};
use crate::playback::{EngineEvent, PlaybackEngine, PlaybackState, PositionTracker};
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub checkpoint_scope: CheckpointScope,
    pub title_history_limit: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            checkpoint_scope: CheckpointScope::Global,
            title_history_limit: 20,
        }
    }
}

pub struct Session<C: Clock, O: AudioOutput, S: KeyValueStore> {
    engine: PlaybackEngine<C, O>,
    tracker: PositionTracker,
    checkpoints: CheckpointStore<Rc<RefCell<S>>>,
    titles: TitleHistory<Rc<RefCell<S>>>,
    loader: Loader,
}

impl<C: Clock, O: AudioOutput, S: KeyValueStore> Session<C, O, S> {
    pub fn new(
        clock: C,
        output: O,
        decoder: Arc<dyn TrackDecoder>,
        backend: S,
        options: SessionOptions,
    ) -> Self {
        let backend = Rc::new(RefCell::new(backend));
        Self {
            engine: PlaybackEngine::new(clock, output),
            tracker: PositionTracker::new(),
            checkpoints: CheckpointStore::new(backend.clone(), options.checkpoint_scope),
            titles: TitleHistory::new(backend, options.title_history_limit),
            loader: Loader::new(decoder),
        }
    }

    /// Publish the persisted lists so the front-end can show them at startup.
    pub fn restore(&mut self, observer: &mut impl PlayerObserver) {
        observer.on_checkpoints_changed(&self.checkpoints.list());
        observer.on_titles_changed(&self.titles.list());
    }

    pub fn state(&self) -> PlaybackState {
        self.engine.state()
    }

    pub fn position(&self) -> f64 {
        self.engine.position()
    }

    pub fn duration(&self) -> f64 {
        self.engine.duration()
    }

    pub fn track_name(&self) -> Option<&str> {
        self.engine.track().map(Track::name)
    }

    pub fn checkpoints(&self) -> Vec<Checkpoint> {
        self.checkpoints.list()
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    /// Start decoding a picked file. `None` means the picker was dismissed.
    pub fn select_file(
        &mut self,
        file: Option<SelectedFile>,
        observer: &mut impl PlayerObserver,
    ) -> Option<LoadTicket> {
        let Some(file) = file else {
            log::debug!("{}", ChoreoError::NoFileSelected);
            return None;
        };
        observer.on_loading(&file.name);
        Some(self.loader.spawn(file))
    }

    /// Reserve a ticket for a decode run by the caller.
    pub fn begin_load(&mut self, file_name: &str, observer: &mut impl PlayerObserver) -> LoadTicket {
        observer.on_loading(file_name);
        self.loader.begin(file_name)
    }

    /// Apply a finished decode if nothing newer was selected since.
    ///
    /// Returns whether the result was applied.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Track>,
        observer: &mut impl PlayerObserver,
    ) -> bool {
        if !self.loader.settle(&ticket) {
            return false;
        }
        match result {
            Ok(track) => {
                let name = track.name().to_string();
                self.engine.load(track);
                self.checkpoints.select_track(&name);
                self.flush_events(observer);
                observer.on_titles_changed(&self.titles.record(&name));
                observer.on_checkpoints_changed(&self.checkpoints.list());
                self.tracker.schedule();
            }
            Err(e) => {
                log::error!("could not load {:?}: {}", ticket.file_name(), e);
                report(&e, observer);
            }
        }
        true
    }

    /// Apply decodes that finished since the last call.
    pub fn pump_loads(&mut self, observer: &mut impl PlayerObserver) {
        while let Some(done) = self.loader.try_recv() {
            self.finish_load(done.ticket, done.result, observer);
        }
    }

    /// Block up to `timeout` for one decode to finish, then apply it.
    pub fn wait_for_load(
        &mut self,
        timeout: std::time::Duration,
        observer: &mut impl PlayerObserver,
    ) -> bool {
        match self.loader.recv_timeout(timeout) {
            Some(done) => self.finish_load(done.ticket, done.result, observer),
            None => false,
        }
    }

    pub fn play_pause(&mut self, observer: &mut impl PlayerObserver) {
        if self.engine.state() == PlaybackState::Playing {
            self.engine.pause();
        } else if let Err(e) = self.engine.play() {
            report(&e, observer);
        }
        self.after_command(observer);
    }

    pub fn stop(&mut self, observer: &mut impl PlayerObserver) {
        self.engine.stop();
        self.after_command(observer);
    }

    pub fn seek_to_fraction(&mut self, fraction: f64, observer: &mut impl PlayerObserver) {
        if let Err(e) = self.engine.seek(fraction) {
            report(&e, observer);
        }
        self.after_command(observer);
    }

    /// Scrub by `seconds` relative to the current position.
    pub fn seek_by(&mut self, seconds: f64, observer: &mut impl PlayerObserver) {
        let duration = self.engine.duration();
        if duration <= 0.0 {
            report(&ChoreoError::NoTrackLoaded, observer);
            return;
        }
        let fraction = (self.engine.position() + seconds) / duration;
        self.seek_to_fraction(fraction, observer);
    }

    pub fn add_checkpoint(&mut self, observer: &mut impl PlayerObserver) {
        if self.engine.track().is_none() {
            report(&ChoreoError::NoTrackLoaded, observer);
            return;
        }
        let list = self
            .checkpoints
            .add(self.engine.position(), self.engine.duration());
        observer.on_checkpoints_changed(&list);
    }

    /// Seek to a stored checkpoint.
    pub fn jump_to_checkpoint(&mut self, index: usize, observer: &mut impl PlayerObserver) {
        let list = self.checkpoints.list();
        match list.get(index) {
            Some(checkpoint) => self.seek_to_fraction(checkpoint.progress, observer),
            None => report(
                &ChoreoError::IndexOutOfRange {
                    index,
                    len: list.len(),
                },
                observer,
            ),
        }
    }

    pub fn remove_checkpoint(&mut self, index: usize, observer: &mut impl PlayerObserver) {
        match self.checkpoints.remove(index) {
            Ok(list) => observer.on_checkpoints_changed(&list),
            Err(e) => report(&e, observer),
        }
    }

    pub fn rename_checkpoint(
        &mut self,
        index: usize,
        label: &str,
        observer: &mut impl PlayerObserver,
    ) {
        let duration = self.engine.track().map(Track::duration);
        match self.checkpoints.rename(index, label, duration) {
            Ok(list) => observer.on_checkpoints_changed(&list),
            Err(e) => report(&e, observer),
        }
    }

    /// Run one frame of the position loop. Cheap when nothing is scheduled.
    pub fn frame(&mut self, observer: &mut impl PlayerObserver) {
        if let Some(report) = self.tracker.on_frame(&mut self.engine) {
            self.flush_events(observer);
            observer.on_position_tick(report.position, report.progress, report.is_complete);
        }
    }

    /// Whether the next `frame` call will report anything.
    pub fn wants_frame(&self) -> bool {
        self.tracker.is_scheduled()
    }

    fn after_command(&mut self, observer: &mut impl PlayerObserver) {
        self.flush_events(observer);
        // One render for every command; the tracker keeps going only while playing.
        self.tracker.schedule();
    }

    fn flush_events(&mut self, observer: &mut impl PlayerObserver) {
        for event in self.engine.drain_events() {
            match event {
                EngineEvent::Loaded { name, duration } => observer.on_file_loaded(&name, duration),
                EngineEvent::StateChanged(state) => observer.on_state_changed(state),
                EngineEvent::Completed => log::info!("reached the end of the track"),
            }
        }
    }
}

fn report(error: &ChoreoError, observer: &mut impl PlayerObserver) {
    if error.kind().is_warning() {
        log::warn!("{}", error);
    } else {
        log::error!("{}", error);
    }
    observer.on_error(error.kind(), &error.to_string());
}
