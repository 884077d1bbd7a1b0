//! Error types for the translation engine.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A key resolved to a note number no MIDI message can carry.
    #[error("Note {note} is outside the MIDI range 0-127")]
    NoteOutOfRange { note: i32 },

    #[error("MIDI sink unavailable: {0}")]
    SinkUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
