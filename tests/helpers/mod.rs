//! Test helpers and fixtures for MasterGrid integration tests

pub mod tolerances;

use mastergrid::prelude::*;
use mastergrid::Layout;

/// Three keys 60, 61, 62 on one row, each 100x100.
pub fn three_key_config() -> EngineConfig {
    EngineConfig::default()
        .with_grid(1, 3)
        .with_low_note(60)
        .with_interval(0)
        .with_velocity(100)
}

pub fn three_key_surface() -> Rect {
    Rect::new(0.0, 0.0, 300.0, 100.0)
}

/// Route engine logs to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A grid that records its output instead of opening a port.
pub fn recording_grid(config: EngineConfig, surface: Rect) -> (MasterGrid, Arc<RecordingSink>) {
    init_tracing();
    let recorder = Arc::new(RecordingSink::new());
    let grid = MasterGrid::builder()
        .config(config)
        .surface(surface)
        .sink(recorder.clone())
        .build()
        .expect("Failed to create test grid");
    (grid, recorder)
}

/// Touch at the centre of the first key playing `note`.
pub fn key_center(layout: &Layout, note: i32) -> Touch {
    let zone = layout
        .zones()
        .iter()
        .find(|zone| zone.note() == note)
        .unwrap_or_else(|| panic!("note {} not in layout", note));
    let region = zone.region();
    Touch::at(region.center_x(), region.center_y())
}
