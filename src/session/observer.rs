use crate::checkpoints::Checkpoint;
use crate::error::ErrorKind;
use crate::playback::PlaybackState;

/// What the player reports back to its front-end.
pub trait PlayerObserver {
    fn on_file_loaded(&mut self, name: &str, duration: f64);
    fn on_position_tick(&mut self, position: f64, progress: f64, is_complete: bool);
    fn on_checkpoints_changed(&mut self, checkpoints: &[Checkpoint]);
    fn on_error(&mut self, kind: ErrorKind, message: &str);

    fn on_titles_changed(&mut self, _titles: &[String]) {}
    fn on_state_changed(&mut self, _state: PlaybackState) {}
    /// A decode for `file_name` started.
    fn on_loading(&mut self, _file_name: &str) {}
}
