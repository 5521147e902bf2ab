use super::*;
use crate::clock::ManualClock;
use crate::error::ChoreoError;
use crate::test_support::{RecordingOutput, assert_close, track};

fn engine() -> (
    PlaybackEngine<ManualClock, RecordingOutput>,
    ManualClock,
    RecordingOutput,
) {
    let clock = ManualClock::starting_at(1000.0);
    let output = RecordingOutput::default();
    let engine = PlaybackEngine::new(clock.clone(), output.clone());
    (engine, clock, output)
}

#[test]
fn position_model_recomputes_from_reference() {
    let running = PositionModel::running_from(50.0, 10.0);
    assert!(running.is_running());
    assert_close(running.position_at(50.0), 10.0);
    assert_close(running.position_at(53.5), 13.5);

    let frozen = PositionModel::frozen(7.0);
    assert!(!frozen.is_running());
    assert_close(frozen.position_at(9999.0), 7.0);
}

#[test]
fn idle_engine_rejects_play_and_seek() {
    let (mut engine, _clock, output) = engine();
    assert_eq!(engine.play(), Err(ChoreoError::NoTrackLoaded));
    assert_eq!(engine.seek(0.5), Err(ChoreoError::NoTrackLoaded));
    engine.pause();
    engine.stop();
    assert_eq!(engine.state(), PlaybackState::Idle);
    assert_eq!(engine.position(), 0.0);
    assert_eq!(engine.progress(), 0.0);
    assert_eq!(output.log.borrow().created, 0);
}

#[test]
fn load_emits_duration_and_resets_position() {
    let (mut engine, _clock, _output) = engine();
    engine.load(track("song", 120.0));
    assert_eq!(engine.state(), PlaybackState::Loaded);
    assert_eq!(engine.position(), 0.0);
    assert_eq!(
        engine.drain_events(),
        vec![
            EngineEvent::Loaded {
                name: "song".into(),
                duration: 120.0
            },
            EngineEvent::StateChanged(PlaybackState::Loaded),
        ]
    );
    assert!(engine.drain_events().is_empty());
}

#[test]
fn load_while_playing_stops_the_old_voice() {
    let (mut engine, clock, output) = engine();
    engine.load(track("a", 60.0));
    engine.play().unwrap();
    clock.advance(3.0);

    engine.load(track("b", 90.0));
    assert_eq!(engine.state(), PlaybackState::Loaded);
    assert!(!engine.is_voice_active());
    assert_eq!(engine.position(), 0.0);
    assert_eq!(engine.duration(), 90.0);
    let log = output.log.borrow();
    assert_eq!(log.stops, 1);
    assert_eq!(log.live, 0);
}

#[test]
fn play_and_pause_track_the_clock() {
    let (mut engine, clock, output) = engine();
    engine.load(track("song", 120.0));
    engine.play().unwrap();
    assert_eq!(engine.state(), PlaybackState::Playing);
    assert_eq!(output.log.borrow().starts, vec![0.0]);

    clock.advance(4.25);
    assert_close(engine.position(), 4.25);

    engine.pause();
    assert_eq!(engine.state(), PlaybackState::Loaded);
    clock.advance(100.0);
    assert_close(engine.position(), 4.25);

    engine.play().unwrap();
    assert_eq!(output.log.borrow().starts, vec![0.0, 4.25]);
    clock.advance(1.0);
    assert_close(engine.position(), 5.25);
}

#[test]
fn pausing_twice_is_the_same_as_once() {
    let (mut engine, clock, output) = engine();
    engine.load(track("song", 120.0));
    engine.play().unwrap();
    clock.advance(2.0);

    engine.pause();
    engine.pause();
    assert_eq!(engine.state(), PlaybackState::Loaded);
    assert_close(engine.position(), 2.0);
    assert_eq!(output.log.borrow().stops, 1);
}

#[test]
fn play_while_playing_is_a_no_op() {
    let (mut engine, clock, output) = engine();
    engine.load(track("song", 120.0));
    engine.play().unwrap();
    clock.advance(1.0);
    engine.play().unwrap();
    assert_eq!(output.log.borrow().created, 1);
    assert_close(engine.position(), 1.0);
}

#[test]
fn seek_while_paused_reads_back_exactly() {
    let (mut engine, _clock, output) = engine();
    engine.load(track("song", 200.0));
    for f in [0.0, 0.125, 0.33, 0.5, 0.999, 1.0] {
        engine.seek(f).unwrap();
        assert_close(engine.position(), f * 200.0);
        assert_close(engine.progress(), f);
    }
    assert_eq!(output.log.borrow().created, 0);
}

#[test]
fn seek_clamps_out_of_range_fractions() {
    let (mut engine, _clock, _output) = engine();
    engine.load(track("song", 100.0));
    engine.seek(-0.5).unwrap();
    assert_eq!(engine.position(), 0.0);
    engine.seek(7.0).unwrap();
    assert_eq!(engine.position(), 100.0);
    engine.seek(f64::NAN).unwrap();
    assert_eq!(engine.position(), 0.0);
}

#[test]
fn seek_while_playing_replaces_the_voice() {
    let (mut engine, clock, output) = engine();
    engine.load(track("song", 100.0));
    engine.play().unwrap();
    clock.advance(10.0);

    engine.seek(0.5).unwrap();
    assert_eq!(engine.state(), PlaybackState::Playing);
    assert_close(engine.position(), 50.0);
    clock.advance(2.0);
    assert_close(engine.position(), 52.0);

    let log = output.log.borrow();
    assert_eq!(log.starts, vec![0.0, 50.0]);
    assert_eq!(log.stops, 1);
    assert_eq!(log.max_live, 1);
}

#[test]
fn stop_rewinds_from_any_loaded_state() {
    let (mut engine, clock, output) = engine();
    engine.load(track("song", 100.0));
    engine.seek(0.4).unwrap();
    engine.stop();
    assert_eq!(engine.position(), 0.0);
    assert_eq!(engine.state(), PlaybackState::Loaded);

    engine.play().unwrap();
    clock.advance(5.0);
    engine.stop();
    assert_eq!(engine.position(), 0.0);
    assert_eq!(output.log.borrow().live, 0);
}

#[test]
fn tick_past_the_end_completes_once() {
    let (mut engine, clock, output) = engine();
    engine.load(track("song", 30.0));
    engine.play().unwrap();
    engine.drain_events();

    clock.advance(29.0);
    let report = engine.tick();
    assert!(!report.is_complete);
    assert_eq!(engine.state(), PlaybackState::Playing);

    clock.advance(5.0);
    let report = engine.tick();
    assert!(report.is_complete);
    assert_eq!(report.position, 30.0);
    assert_eq!(report.progress, 1.0);
    assert_eq!(engine.state(), PlaybackState::Completed);

    clock.advance(5.0);
    engine.tick();
    engine.pause();
    assert_eq!(engine.position(), 30.0);
    assert_eq!(output.log.borrow().stops, 1);
    assert_eq!(
        engine.drain_events(),
        vec![
            EngineEvent::StateChanged(PlaybackState::Completed),
            EngineEvent::Completed,
        ]
    );
}

#[test]
fn play_after_completion_starts_over() {
    let (mut engine, clock, output) = engine();
    engine.load(track("song", 10.0));
    engine.play().unwrap();
    clock.advance(11.0);
    engine.tick();
    assert_eq!(engine.state(), PlaybackState::Completed);

    engine.play().unwrap();
    assert_eq!(engine.position(), 0.0);
    assert_eq!(output.log.borrow().starts, vec![0.0, 0.0]);
}

#[test]
fn seek_after_completion_returns_to_loaded() {
    let (mut engine, clock, _output) = engine();
    engine.load(track("song", 10.0));
    engine.play().unwrap();
    clock.advance(12.0);
    engine.tick();

    engine.seek(0.2).unwrap();
    assert_eq!(engine.state(), PlaybackState::Loaded);
    assert_close(engine.position(), 2.0);
}

#[test]
fn position_never_leaves_track_bounds() {
    let (mut engine, clock, output) = engine();
    engine.load(track("song", 20.0));

    // A fixed pseudo-random walk over every command.
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    for _ in 0..500 {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        match seed % 6 {
            0 => {
                let _ = engine.play();
            }
            1 => engine.pause(),
            2 => engine.stop(),
            3 => {
                let _ = engine.seek((seed % 1000) as f64 / 800.0 - 0.1);
            }
            4 => clock.advance((seed % 700) as f64 / 100.0),
            _ => {
                engine.tick();
            }
        }
        let p = engine.position();
        assert!((0.0..=20.0).contains(&p), "position {p} out of bounds");
        assert!(output.log.borrow().live <= 1);
    }
    assert_eq!(output.log.borrow().max_live, 1);
}

#[test]
fn pause_seek_play_stop_scenario() {
    let (mut engine, clock, _output) = engine();
    engine.load(track("song", 120.0));
    engine.play().unwrap();
    clock.advance(10.0);
    engine.pause();
    assert_close(engine.position(), 10.0);

    engine.seek(0.5).unwrap();
    assert_close(engine.position(), 60.0);

    engine.play().unwrap();
    clock.advance(5.0);
    assert_close(engine.position(), 65.0);
    engine.stop();
    assert_eq!(engine.position(), 0.0);
    assert_eq!(engine.state(), PlaybackState::Loaded);
}

#[test]
fn tracker_rearms_only_while_playing() {
    let (mut engine, clock, _output) = engine();
    let mut tracker = PositionTracker::new();
    assert_eq!(tracker.on_frame(&mut engine), None);

    engine.load(track("song", 10.0));
    engine.play().unwrap();
    tracker.schedule();

    clock.advance(1.0);
    let report = tracker.on_frame(&mut engine).unwrap();
    assert_close(report.position, 1.0);
    assert!(tracker.is_scheduled());

    engine.pause();
    let report = tracker.on_frame(&mut engine).unwrap();
    assert_close(report.position, 1.0);
    assert!(!tracker.is_scheduled());
    assert_eq!(tracker.on_frame(&mut engine), None);
}

#[test]
fn tracker_stops_after_completion() {
    let (mut engine, clock, _output) = engine();
    let mut tracker = PositionTracker::new();
    engine.load(track("song", 4.0));
    engine.play().unwrap();
    tracker.schedule();

    clock.advance(5.0);
    let report = tracker.on_frame(&mut engine).unwrap();
    assert!(report.is_complete);
    assert_eq!(report.progress, 1.0);
    assert!(!tracker.is_scheduled());
}

#[test]
fn tracker_tolerates_missing_track() {
    let (mut engine, _clock, _output) = engine();
    let mut tracker = PositionTracker::new();
    tracker.schedule();
    let report = tracker.on_frame(&mut engine).unwrap();
    assert_eq!(report.position, 0.0);
    assert_eq!(report.progress, 0.0);
    assert!(!report.is_complete);
}
