use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::*;
use crate::model::{FretNote, Tab, TabMeasure, TabSection};
use crate::{demo_tab, load_tab};

fn tab_with(measures: usize) -> Tab {
    Tab {
        title: None,
        sections: vec![TabSection::new(
            (0..measures)
                .map(|i| TabMeasure::new(vec![FretNote::new(i % 6, 0, 0.5)]))
                .collect(),
            None,
        )],
    }
}

fn player(measures: usize) -> CapoPlayer {
    CapoPlayer::new(tab_with(measures), PlaybackConfig::default()).unwrap()
}

fn loop_flags(player: &CapoPlayer) -> Vec<bool> {
    player.snapshot().measures.iter().map(|m| m.loop_selected).collect()
}

fn record_events(player: &mut CapoPlayer) -> Rc<RefCell<Vec<PlaybackEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    player.subscribe(move |e| sink.borrow_mut().push(e.clone()));
    events
}

/// Run ticks until the traversal finishes, returning the positions seen on the way.
fn run_to_end_of_measure(player: &mut CapoPlayer) -> Vec<f64> {
    let measure = player.active_measure();
    let mut positions = Vec::new();
    for _ in 0..=player.config().total_ticks() {
        player.tick();
        if player.elapsed_ticks() == 0 {
            return positions;
        }
        assert_eq!(player.active_measure(), measure);
        positions.push(player.marker_position());
    }
    panic!("traversal never finished");
}

#[test]
fn test_new_player_is_idle() {
    let p = player(3);
    assert_eq!(p.status(), PlaybackStatus::Idle);
    assert_eq!(p.active_measure(), None);
    assert_eq!(p.marker_position(), 20.0);
}

#[test]
fn test_invalid_config_rejected() {
    let config = PlaybackConfig {
        traversal_seconds: 0.0,
        ..Default::default()
    };
    assert!(CapoPlayer::new(tab_with(2), config).is_err());
}

#[test]
fn test_tap_clamps_low() {
    let mut p = player(4);
    p.on_tap(1, -100.0);
    assert_eq!(p.marker_position(), 20.0);
    assert_eq!(p.active_measure(), Some(1));
}

#[test]
fn test_tap_clamps_high() {
    let mut p = player(4);
    p.on_tap(1, 100_000.0);
    assert_eq!(p.marker_position(), 596.0);
}

#[test]
fn test_tap_out_of_range_measure_is_ignored() {
    let mut p = player(2);
    p.on_tap(0, 100.0);
    p.on_tap(5, 200.0);
    assert_eq!(p.active_measure(), Some(0));
    assert_eq!(p.marker_position(), 100.0);
}

#[test]
fn test_play_without_active_measure_stays_idle() {
    let mut p = player(3);
    p.toggle_playback();
    assert_eq!(p.status(), PlaybackStatus::Idle);
    p.tick();
    assert_eq!(p.marker_position(), 20.0);
}

#[test]
fn test_toggle_playback_pauses() {
    let mut p = player(3);
    p.on_tap(0, 20.0);
    p.toggle_playback();
    assert_eq!(p.status(), PlaybackStatus::Running);
    p.tick();
    let paused_at = p.marker_position();
    p.toggle_playback();
    assert_eq!(p.status(), PlaybackStatus::Idle);
    p.tick();
    assert_eq!(p.marker_position(), paused_at);
}

#[test]
fn test_loop_transfer_on_tap() {
    let mut p = player(4);
    p.on_tap(0, 50.0);
    p.toggle_loop(0);
    p.on_tap(3, 250.0);
    assert_eq!(loop_flags(&p), vec![false, false, false, true]);
    assert_eq!(p.active_measure(), Some(3));
    assert_eq!(p.marker_position(), 250.0);
}

#[test]
fn test_tap_without_loop_leaves_selection_alone() {
    let mut p = player(4);
    p.toggle_loop(2);
    p.on_tap(0, 50.0);
    p.on_tap(1, 60.0);
    assert_eq!(loop_flags(&p), vec![false, false, true, false]);
}

#[test]
fn test_tap_same_looped_measure_keeps_loop() {
    let mut p = player(3);
    p.on_tap(1, 50.0);
    p.toggle_active_loop();
    p.on_tap(1, 400.0);
    assert_eq!(loop_flags(&p), vec![false, true, false]);
}

#[test]
fn test_loop_button_needs_active_measure() {
    let mut p = player(3);
    p.toggle_active_loop();
    assert_eq!(loop_flags(&p), vec![false; 3]);
    p.on_tap(2, 30.0);
    p.toggle_active_loop();
    assert_eq!(loop_flags(&p), vec![false, false, true]);
    p.toggle_active_loop();
    assert_eq!(loop_flags(&p), vec![false; 3]);
}

#[test]
fn test_sequential_advance() {
    let mut p = player(3);
    p.on_tap(0, 20.0);
    p.toggle_playback();
    run_to_end_of_measure(&mut p);
    assert_eq!(p.active_measure(), Some(1));
    assert_eq!(p.marker_position(), 20.0);
}

#[test]
fn test_sequential_wraparound() {
    let mut p = player(3);
    p.on_tap(2, 20.0);
    p.toggle_playback();
    run_to_end_of_measure(&mut p);
    assert_eq!(p.active_measure(), Some(0));
    assert_eq!(p.marker_position(), 20.0);
    assert_eq!(p.status(), PlaybackStatus::Running);
}

#[test]
fn test_loop_persists_across_traversals() {
    let mut p = player(3);
    p.on_tap(1, 20.0);
    p.toggle_loop(1);
    p.toggle_playback();
    for _ in 0..5 {
        run_to_end_of_measure(&mut p);
        assert_eq!(p.active_measure(), Some(1));
        assert_eq!(p.marker_position(), 20.0);
    }
}

#[test]
fn test_clearing_loop_mid_play_resumes_sequence() {
    let mut p = player(3);
    p.on_tap(1, 20.0);
    p.toggle_loop(1);
    p.toggle_playback();
    run_to_end_of_measure(&mut p);
    p.clear_loops();
    run_to_end_of_measure(&mut p);
    assert_eq!(p.active_measure(), Some(2));
}

#[test]
fn test_scenario_tap_loop_play() {
    let mut p = player(4);
    p.on_tap(2, 300.0);
    assert_eq!(p.active_measure(), Some(2));
    assert_eq!(p.marker_position(), 300.0);

    p.toggle_loop(2);
    assert_eq!(loop_flags(&p), vec![false, false, true, false]);

    p.toggle_playback();
    let positions = run_to_end_of_measure(&mut p);
    assert!(positions.windows(2).all(|w| w[1] > w[0]));
    assert!(positions[0] >= 300.0);
    assert!(*positions.last().unwrap() < 596.0);
    assert_eq!(p.marker_position(), 20.0);
    assert_eq!(p.active_measure(), Some(2));
}

#[test]
fn test_full_traversal_takes_total_ticks() {
    let mut p = player(2);
    p.on_tap(0, 20.0);
    p.toggle_playback();
    let positions = run_to_end_of_measure(&mut p);
    assert_eq!(positions.len() as u32, p.config().total_ticks() - 1);
}

#[test]
fn test_restart_from_tap_resumes_proportionally() {
    let mut p = player(3);
    p.on_tap(0, 20.0);
    p.toggle_playback();
    for _ in 0..10 {
        p.tick();
    }
    p.on_tap(1, 308.0);
    assert_eq!(p.elapsed_ticks(), 90);
    assert_eq!(p.marker_position(), 308.0);
    let remaining = run_to_end_of_measure(&mut p);
    assert_eq!(remaining.len(), 89);
    assert_eq!(p.active_measure(), Some(2));
}

#[test]
fn test_pause_resume_keeps_tick() {
    let mut p = player(2);
    p.on_tap(0, 20.0);
    p.toggle_playback();
    for k in 1..p.config().total_ticks() {
        p.tick();
        assert_eq!(p.elapsed_ticks(), k);
        let position = p.marker_position();
        p.toggle_playback();
        p.toggle_playback();
        assert_eq!(p.elapsed_ticks(), k, "resume moved tick {}", k);
        assert_eq!(p.marker_position(), position);
    }
    p.tick();
    assert_eq!(p.active_measure(), Some(1));
}

#[test]
fn test_tap_at_marker_while_playing_keeps_tick() {
    let mut p = player(2);
    p.on_tap(0, 20.0);
    p.toggle_playback();
    for k in 1..p.config().total_ticks() {
        p.tick();
        let position = p.marker_position();
        p.on_tap(0, position);
        assert_eq!(p.elapsed_ticks(), k);
    }
}

#[test]
fn test_tap_while_playing_restarts_timer_once() {
    let mut p = player(3);
    let events = record_events(&mut p);
    p.on_tap(0, 20.0);
    p.toggle_playback();
    p.on_tap(1, 100.0);
    let starts = events
        .borrow()
        .iter()
        .filter(|e| matches!(e, PlaybackEvent::Started { .. }))
        .count();
    assert_eq!(starts, 2);
}

#[test]
fn test_teardown_stops_playback() {
    let mut p = player(3);
    p.on_tap(0, 20.0);
    p.toggle_playback();
    p.teardown();
    assert_eq!(p.status(), PlaybackStatus::Idle);
    let t0 = Instant::now();
    p.pump(t0);
    assert_eq!(p.pump(t0 + Duration::from_secs(1)), 0);
    assert_eq!(p.marker_position(), 20.0);
}

#[test]
fn test_pump_runs_due_ticks() {
    let mut p = player(2);
    p.on_tap(0, 20.0);
    p.toggle_playback();
    let t0 = Instant::now();
    assert_eq!(p.pump(t0), 0);
    let ran = p.pump(t0 + Duration::from_millis(500));
    assert!(ran == 29 || ran == 30, "ran {} ticks", ran);
    assert_eq!(p.elapsed_ticks(), ran);
}

#[test]
fn test_events_for_transitions() {
    let mut p = player(2);
    p.on_tap(1, 20.0);
    p.toggle_playback();
    let events = record_events(&mut p);
    run_to_end_of_measure(&mut p);
    assert!(events.borrow().contains(&PlaybackEvent::Wrapped { from: 1 }));

    p.toggle_loop(0);
    run_to_end_of_measure(&mut p);
    assert!(events.borrow().contains(&PlaybackEvent::LoopRestarted { measure: 0 }));
    assert!(events
        .borrow()
        .contains(&PlaybackEvent::LoopSelectionChanged { selected: Some(0) }));
}

#[test]
fn test_loop_toggles_keep_single_selection() {
    let mut p = player(5);
    for i in [0, 3, 3, 1, 4, 9, 2, 2, 0] {
        p.toggle_loop(i);
        assert!(loop_flags(&p).iter().filter(|f| **f).count() <= 1);
    }
}

#[test]
fn test_snapshot_carries_section_names() {
    let p = CapoPlayer::new(demo_tab(), PlaybackConfig::default()).unwrap();
    let snap = p.snapshot();
    assert_eq!(snap.measures.len(), 5);
    assert_eq!(snap.measures[0].section_name.as_deref(), Some("Intro"));
    assert_eq!(snap.measures[1].section_name.as_deref(), Some("Em"));
    assert_eq!(snap.measures[2].section_name, None);
}

#[test]
fn test_custom_timing_from_yaml() {
    let source = r#"
playback:
  traversal-seconds: 1.0
  ticks-per-second: 10
sections:
  - measures:
      - notes: []
      - notes: []
"#;
    let (tab, config) = load_tab(source).unwrap();
    let mut p = CapoPlayer::new(tab, config).unwrap();
    p.on_tap(0, 0.0);
    p.toggle_playback();
    let positions = run_to_end_of_measure(&mut p);
    assert_eq!(positions.len(), 9);
    assert_eq!(p.active_measure(), Some(1));
}
