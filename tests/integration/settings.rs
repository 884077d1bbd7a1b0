//! Reconfiguration, resize and layout queries.

use approx::assert_relative_eq;
use mastergrid::prelude::*;

use crate::helpers::tolerances::GEOMETRY_EPSILON;
use crate::helpers::*;

#[test]
fn test_channel_change_keeps_held_note() {
    let (grid, recorder) = recording_grid(three_key_config(), three_key_surface());
    let touch = key_center(&grid.layout(), 60);
    grid.on_touch_down(TouchId(1), touch).unwrap();

    grid.apply_config(three_key_config().with_channel(4)).unwrap();
    assert_eq!(grid.sounding_notes(), vec![60]);

    grid.on_touch_down(TouchId(2), key_center(&grid.layout(), 62)).unwrap();
    grid.on_touch_up(TouchId(1), touch).unwrap();

    assert_eq!(
        recorder.take(),
        vec![
            MidiMessage::note_on(0, 60, 100),
            MidiMessage::note_on(4, 62, 100),
            // Ends on the channel it started on
            MidiMessage::note_off(0, 60),
        ]
    );
}

#[test]
fn test_interval_change_relayouts() {
    let config = EngineConfig::default().with_grid(2, 4).with_low_note(48);
    let (grid, recorder) = recording_grid(config.clone(), Rect::new(0.0, 0.0, 400.0, 200.0));
    grid.on_touch_down(TouchId(1), Touch::at(50.0, 50.0)).unwrap();
    assert_eq!(grid.sounding_notes(), vec![53]);

    grid.apply_config(config.with_interval(7)).unwrap();
    assert_eq!(grid.active_touches(), 0);
    assert_eq!(recorder.take().last(), Some(&MidiMessage::note_off(0, 53)));

    let top_row: Vec<i32> = grid.layout().row(1).iter().map(|z| z.note()).collect();
    assert_eq!(top_row, vec![55, 56, 57, 58]);
}

#[test]
fn test_wide_interval_is_a_legal_setting() {
    let (grid, recorder) = recording_grid(three_key_config(), three_key_surface());
    grid.apply_config(three_key_config().with_grid(2, 3).with_interval(200))
        .unwrap();
    assert_eq!(grid.config().interval, 200);

    let layout = grid.layout();
    let result = grid.on_touch_down(TouchId(1), key_center(&layout, 261));
    assert!(matches!(
        result,
        Err(mastergrid::Error::Core(mastergrid::core::Error::NoteOutOfRange { note: 261 }))
    ));
    assert!(grid.sounding_notes().is_empty());
    assert!(recorder.take().is_empty());
}

#[test]
fn test_resize_moves_keys_under_held_touch() {
    let (grid, recorder) = recording_grid(three_key_config(), three_key_surface());
    let id = TouchId(1);
    grid.on_touch_down(id, Touch::at(150.0, 50.0)).unwrap();

    grid.resize(Rect::new(0.0, 0.0, 600.0, 200.0));
    assert_eq!(grid.sounding_notes(), vec![61]);
    for zone in grid.layout().zones() {
        assert_relative_eq!(zone.region().width(), 200.0, epsilon = GEOMETRY_EPSILON);
        assert_relative_eq!(zone.region().height(), 200.0, epsilon = GEOMETRY_EPSILON);
    }

    // Same spot now lies on the first key
    grid.on_touch_move(id, Touch::at(150.0, 50.0)).unwrap();
    assert_eq!(
        recorder.take(),
        vec![
            MidiMessage::note_on(0, 61, 100),
            MidiMessage::note_off(0, 61),
            MidiMessage::note_on(0, 60, 100),
        ]
    );
}

#[test]
fn test_key_labels_for_renderer() {
    let config = EngineConfig::default().with_grid(1, 12).with_low_note(60);
    let (grid, _recorder) = recording_grid(config, Rect::new(0.0, 0.0, 1200.0, 100.0));
    let layout = grid.layout();

    let labels: Vec<&str> = layout.zones().iter().map(|z| z.label()).collect();
    assert_eq!(
        labels,
        vec!["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"]
    );
    let black: Vec<bool> = layout.zones().iter().map(|z| z.is_accidental()).collect();
    assert_eq!(
        black,
        vec![false, true, false, true, false, false, true, false, true, false, true, false]
    );
}

#[test]
fn test_aftertouch_follows_finger() {
    let config = three_key_config().with_aftertouch(true).with_sensitivity(2.0);
    let (grid, recorder) = recording_grid(config, three_key_surface());
    let id = TouchId(1);

    grid.on_touch_down(id, Touch::at(50.0, 50.0)).unwrap();
    grid.on_touch_move(id, Touch::at(50.0, 40.0)).unwrap();
    grid.on_touch_move(id, Touch::at(50.0, 20.0)).unwrap();

    assert_eq!(
        recorder.take(),
        vec![
            MidiMessage::note_on(0, 60, 100),
            MidiMessage::pressure(0, 60, 80),
            MidiMessage::pressure(0, 60, 40),
        ]
    );
}
