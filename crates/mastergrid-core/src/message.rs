//! Outbound MIDI messages, independent of byte framing.

use crate::error::Result;
use crate::note::midi_note;

/// A message the engine hands to a [`MidiSink`](crate::MidiSink).
///
/// All fields are already range-checked: channel 0-15, data bytes 0-127.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MidiMessage {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8, velocity: u8 },
    /// Aftertouch for a held note. Sinks decide whether it goes out as
    /// polyphonic key pressure or plain channel pressure.
    Pressure { channel: u8, note: u8, value: u8 },
}

impl MidiMessage {
    #[inline]
    pub fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        Self::NoteOn {
            channel,
            note,
            velocity,
        }
    }

    #[inline]
    pub fn note_off(channel: u8, note: u8) -> Self {
        Self::NoteOff {
            channel,
            note,
            velocity: 0,
        }
    }

    #[inline]
    pub fn pressure(channel: u8, note: u8, value: u8) -> Self {
        Self::Pressure {
            channel,
            note,
            value,
        }
    }

    /// Note-on for a layout note number; fails outside 0-127.
    pub fn try_note_on(channel: u8, note: i32, velocity: u8) -> Result<Self> {
        Ok(Self::note_on(channel.min(15), midi_note(note)?, velocity.min(127)))
    }

    #[inline]
    pub fn channel(&self) -> u8 {
        match *self {
            Self::NoteOn { channel, .. }
            | Self::NoteOff { channel, .. }
            | Self::Pressure { channel, .. } => channel,
        }
    }

    #[inline]
    pub fn note(&self) -> u8 {
        match *self {
            Self::NoteOn { note, .. } | Self::NoteOff { note, .. } | Self::Pressure { note, .. } => {
                note
            }
        }
    }

    #[inline]
    pub fn is_note_on(&self) -> bool {
        matches!(self, Self::NoteOn { .. })
    }

    #[inline]
    pub fn is_note_off(&self) -> bool {
        matches!(self, Self::NoteOff { .. })
    }

    #[inline]
    pub fn is_pressure(&self) -> bool {
        matches!(self, Self::Pressure { .. })
    }
}
