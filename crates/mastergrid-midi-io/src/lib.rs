//! MIDI output subsystem for MasterGrid.
//!
//! Frames engine messages as MIDI bytes and, with the `midi-io` feature,
//! drives a hardware or virtual output port from a dedicated thread. The
//! [`MidiOutputManager`] implements [`mastergrid_core::MidiSink`], so it plugs
//! straight into a touch engine.

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::{MidiOutputConfig, DEFAULT_DEVICE_NAME};

pub mod message;
pub use message::{MidiOutputMessage, PressureMode};

#[cfg(feature = "midi-io")]
pub(crate) mod io;

#[cfg(feature = "midi-io")]
pub use io::{MidiOutputDevice, MidiOutputManager};
