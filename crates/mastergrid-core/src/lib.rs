//! Multitouch-to-MIDI translation engine for MasterGrid.
//!
//! Derives a grid of keys from a handful of musical parameters, resolves touch
//! coordinates to notes, tracks every touch from down to up, and emits note
//! and aftertouch events to a [`MidiSink`].
//!
//! # Example
//!
//! ```ignore
//! use mastergrid_core::{EngineConfig, RecordingSink, Touch, TouchEngine, TouchId, DEFAULT_SURFACE};
//!
//! let engine = TouchEngine::new(EngineConfig::default(), DEFAULT_SURFACE, RecordingSink::new())?;
//!
//! engine.on_touch_down(TouchId(1), Touch::at(12.0, 590.0))?;
//! engine.on_touch_move(TouchId(1), Touch::at(48.0, 590.0))?;
//! engine.on_touch_up(TouchId(1), Touch::at(48.0, 590.0))?;
//!
//! // Settings changed: release everything, lay out the new grid
//! engine.rebuild_layout(EngineConfig::default().with_interval(7))?;
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::{EngineConfig, MAX_KEYS};

pub mod geometry;
pub use geometry::{Point, Rect, Surface, DEFAULT_SURFACE};

pub mod layout;
pub use layout::{KeyZone, Layout};

pub mod resolver;
pub use resolver::{center_of, resolve};

pub mod expression;
pub use expression::{pressure_on_hold, velocity_on_attack, Touch};

pub mod message;
pub use message::MidiMessage;

pub mod sink;
pub use sink::{ChannelSink, MidiSink, RecordingSink};

pub mod session;
pub use session::{TouchId, TouchSession, Voice};

mod engine;
pub use engine::TouchEngine;

pub mod note;
pub use note::{is_accidental, midi_note, note_name};
