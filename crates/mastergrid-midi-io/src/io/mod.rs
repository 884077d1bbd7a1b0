//! Hardware MIDI output.
//!
//! Device enumeration, connection, and real-time output via midir.
//! Requires the `midi-io` feature.

mod output;

pub use output::{MidiOutputDevice, MidiOutputManager};
