//! # MasterGrid - Multitouch Isomorphic Keyboard
//!
//! Turns multitouch input into MIDI over a grid of keys laid out from a few
//! musical parameters.
//!
//! ## Architecture
//!
//! MasterGrid is an umbrella crate that coordinates:
//! - **mastergrid-core** - Key layout, point resolution, touch tracking, expression
//! - **mastergrid-midi-io** - Message framing and hardware MIDI output
//!
//! ## Quick Start
//!
//! ```ignore
//! use mastergrid::prelude::*;
//!
//! // Opens "LMMS", or the first output port when it is missing
//! let grid = MasterGrid::builder()
//!     .config(EngineConfig::default().with_aftertouch(true))
//!     .surface(Rect::new(0.0, 0.0, 1024.0, 768.0))
//!     .build()?;
//!
//! grid.on_touch_down(TouchId(1), Touch::at(40.0, 700.0))?;
//! grid.on_touch_move(TouchId(1), Touch::at(40.0, 690.0))?;
//! grid.on_touch_up(TouchId(1), Touch::at(40.0, 690.0))?;
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Hardware MIDI output
//! - `midi-hardware` - Output ports via midir

/// Re-export of mastergrid-core for direct access
pub use mastergrid_core as core;

/// Re-export of mastergrid-midi-io for direct access
pub use mastergrid_midi_io as midi;

pub use mastergrid_core::{
    ChannelSink, EngineConfig, KeyZone, Layout, MidiMessage, MidiSink, Point, Rect,
    RecordingSink, Surface, Touch, TouchEngine, TouchId, TouchSession, Voice, DEFAULT_SURFACE,
};

pub use mastergrid_midi_io::{MidiOutputConfig, MidiOutputMessage, PressureMode};

#[cfg(feature = "midi-hardware")]
pub use mastergrid_midi_io::{MidiOutputDevice, MidiOutputManager};

mod error;
pub use error::{Error, Result};

mod builder;
mod engine;

pub use builder::MasterGridBuilder;
pub use engine::MasterGrid;

/// Convenience prelude for common imports
pub mod prelude {
    // Main entry point
    pub use crate::{MasterGrid, MasterGridBuilder};

    // Input and settings
    pub use crate::core::{EngineConfig, Point, Rect, Touch, TouchId};

    // Sinks
    pub use crate::core::{MidiMessage, MidiSink, RecordingSink};

    // Output
    pub use crate::midi::{MidiOutputConfig, PressureMode};

    pub use std::sync::Arc;
}
