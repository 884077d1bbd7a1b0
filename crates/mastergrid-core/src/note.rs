//! Note-number helpers: range checks, pitch-class names, accidentals.

use crate::error::{Error, Result};

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Narrow a layout note number to a MIDI data byte.
#[inline]
pub fn midi_note(note: i32) -> Result<u8> {
    u8::try_from(note)
        .ok()
        .filter(|n| *n < 128)
        .ok_or(Error::NoteOutOfRange { note })
}

#[inline]
fn pitch_class(note: i32) -> usize {
    note.rem_euclid(12) as usize
}

/// Pitch-class name, e.g. `C#` for 61.
pub fn note_name(note: i32) -> &'static str {
    NOTE_NAMES[pitch_class(note)]
}

/// Black-key pitch classes: C#, D#, F#, G#, A#.
pub fn is_accidental(note: i32) -> bool {
    matches!(pitch_class(note), 1 | 3 | 6 | 8 | 10)
}
