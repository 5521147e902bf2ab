use super::*;
use choreo::checkpoints::Checkpoint;
use choreo::error::ErrorKind;
use choreo::playback::PlaybackState;
use choreo::session::PlayerObserver;

fn cp(label: &str, progress: f64) -> Checkpoint {
    Checkpoint {
        label: label.into(),
        progress,
    }
}

fn app_with(n: usize) -> App {
    let mut app = App::new();
    let list: Vec<Checkpoint> = (0..n).map(|i| cp(&format!("{i}"), 0.1 * i as f64)).collect();
    app.on_checkpoints_changed(&list);
    app
}

#[test]
fn selection_wraps_both_ways() {
    let mut app = app_with(3);
    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);
    app.next();
    assert_eq!(app.selected, 1);
}

#[test]
fn selection_is_a_no_op_without_checkpoints() {
    let mut app = App::new();
    app.next();
    app.prev();
    assert_eq!(app.selected, 0);
    assert!(app.selected_checkpoint().is_none());
}

#[test]
fn shrinking_list_clamps_selection() {
    let mut app = app_with(3);
    app.selected = 2;
    app.on_checkpoints_changed(&[cp("a", 0.1), cp("b", 0.2)]);
    assert_eq!(app.selected, 1);
    app.on_checkpoints_changed(&[]);
    assert_eq!(app.selected, 0);
}

#[test]
fn rename_prefills_and_hands_back_the_index() {
    let mut app = app_with(2);
    app.next();
    app.begin_rename();
    assert_eq!(app.input_mode, InputMode::Rename { index: 1 });
    assert_eq!(app.input, "1");

    app.pop_input_char();
    for c in "bridge".chars() {
        app.push_input_char(c);
    }
    let (mode, text) = app.take_input().unwrap();
    assert_eq!(mode, InputMode::Rename { index: 1 });
    assert_eq!(text, "bridge");
    assert!(!app.is_editing());
    assert!(app.input.is_empty());
}

#[test]
fn rename_needs_a_checkpoint() {
    let mut app = App::new();
    app.begin_rename();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.take_input().is_none());
}

#[test]
fn typing_is_ignored_outside_input_mode() {
    let mut app = App::new();
    app.push_input_char('x');
    assert!(app.input.is_empty());

    app.begin_open();
    app.push_input_char('x');
    app.cancel_input();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.input.is_empty());
}

#[test]
fn observer_callbacks_update_the_model() {
    let mut app = App::new();
    app.on_loading("song.mp3");
    assert_eq!(app.loading.as_deref(), Some("song.mp3"));

    app.on_file_loaded("Song", 120.0);
    app.on_state_changed(PlaybackState::Loaded);
    assert!(app.loading.is_none());
    assert_eq!(app.track_name.as_deref(), Some("Song"));
    assert_eq!(app.duration, 120.0);
    assert_eq!(app.state, PlaybackState::Loaded);

    app.on_position_tick(60.0, 0.5, false);
    assert_eq!(app.progress, 0.5);
    app.on_position_tick(120.0, 1.0, true);
    assert_eq!(app.message.as_ref().unwrap().text, "end of track");

    app.on_titles_changed(&["Song".to_string()]);
    assert_eq!(app.titles, vec!["Song"]);
}

#[test]
fn warnings_and_errors_are_told_apart() {
    let mut app = App::new();
    app.on_error(ErrorKind::NoTrackLoaded, "no track loaded");
    assert!(!app.message.as_ref().unwrap().is_error);

    app.on_error(ErrorKind::Decode, "could not decode audio: bad.ogg");
    assert!(app.message.as_ref().unwrap().is_error);

    app.clear_message();
    assert!(app.message.is_none());
}

#[test]
fn failed_read_keeps_the_pending_decode_visible() {
    let mut app = App::new();
    app.on_loading("slow.flac");
    app.on_error(ErrorKind::Decode, "could not decode audio: missing.mp3");
    app.sync_loading(true);
    assert_eq!(app.loading.as_deref(), Some("slow.flac"));

    app.sync_loading(false);
    assert!(app.loading.is_none());
}

#[test]
fn settings_warning_shows_as_an_error_line() {
    let mut app = App::new();
    app.set_warning("invalid settings in /tmp/c.toml, using defaults");
    let message = app.message.as_ref().unwrap();
    assert!(message.is_error);
    assert!(message.text.starts_with("invalid settings"));
}
