//! Grid lifecycle and gesture tests through the facade.

use mastergrid::prelude::*;
use mastergrid::Error;

use crate::helpers::*;

#[test]
fn test_tap_plays_one_note() {
    let (grid, recorder) = recording_grid(three_key_config(), three_key_surface());
    let touch = key_center(&grid.layout(), 61);

    grid.on_touch_down(TouchId(1), touch).unwrap();
    assert_eq!(grid.sounding_notes(), vec![61]);
    grid.on_touch_up(TouchId(1), touch).unwrap();

    assert_eq!(
        recorder.take(),
        vec![MidiMessage::note_on(0, 61, 100), MidiMessage::note_off(0, 61)]
    );
    assert_eq!(grid.active_touches(), 0);
}

#[test]
fn test_glissando_across_row() {
    let (grid, recorder) = recording_grid(three_key_config(), three_key_surface());
    let id = TouchId(3);

    grid.on_touch_down(id, Touch::at(10.0, 50.0)).unwrap();
    for x in (20..300).step_by(10) {
        grid.on_touch_move(id, Touch::at(x as f32, 50.0)).unwrap();
    }
    grid.on_touch_up(id, Touch::at(295.0, 50.0)).unwrap();

    let notes_on: Vec<u8> = recorder
        .messages()
        .iter()
        .filter(|m| m.is_note_on())
        .map(|m| m.note())
        .collect();
    assert_eq!(notes_on, vec![60, 61, 62]);
    assert_eq!(recorder.len(), 6);
}

#[test]
fn test_invalid_config_fails_build() {
    let result = MasterGrid::builder()
        .config(EngineConfig::default().with_channel(16))
        .sink(Arc::new(RecordingSink::new()))
        .build();
    assert!(matches!(
        result,
        Err(Error::Core(mastergrid::core::Error::InvalidConfig(_)))
    ));
}

#[test]
fn test_sink_failure_surfaces_as_core_error() {
    let (grid, recorder) = recording_grid(three_key_config(), three_key_surface());
    recorder.set_available(false);

    let result = grid.on_touch_down(TouchId(1), Touch::at(50.0, 50.0));
    assert!(matches!(
        result,
        Err(Error::Core(mastergrid::core::Error::SinkUnavailable(_)))
    ));
    assert_eq!(grid.sounding_notes(), vec![60]);
}

#[test]
fn test_panic_releases_everything() {
    let (grid, recorder) = recording_grid(three_key_config(), three_key_surface());
    grid.on_touch_down(TouchId(1), Touch::at(50.0, 50.0)).unwrap();
    grid.on_touch_down(TouchId(2), Touch::at(250.0, 50.0)).unwrap();
    recorder.take();

    grid.all_notes_off().unwrap();

    let mut released: Vec<u8> = recorder.take().iter().map(|m| m.note()).collect();
    released.sort_unstable();
    assert_eq!(released, vec![60, 62]);
    assert_eq!(grid.active_touches(), 0);
}

#[test]
fn test_drop_releases_sounding_notes() {
    let (grid, recorder) = recording_grid(three_key_config(), three_key_surface());
    grid.on_touch_down(TouchId(1), Touch::at(150.0, 50.0)).unwrap();
    drop(grid);

    assert_eq!(
        recorder.messages(),
        vec![MidiMessage::note_on(0, 61, 100), MidiMessage::note_off(0, 61)]
    );
}

#[test]
fn test_drop_when_idle_sends_nothing() {
    let (grid, recorder) = recording_grid(three_key_config(), three_key_surface());
    drop(grid);
    assert!(recorder.is_empty());
}

#[cfg(feature = "midi-hardware")]
#[test]
fn test_sink_grid_has_no_hardware_output() {
    let (grid, _recorder) = recording_grid(three_key_config(), three_key_surface());
    assert!(grid.output().is_none());
    assert!(!grid.is_output_connected());
    assert_eq!(grid.connected_device_name(), None);
    assert!(matches!(
        grid.connect_output(None),
        Err(Error::Midi(mastergrid::midi::Error::MidiDevice(_)))
    ));
}
