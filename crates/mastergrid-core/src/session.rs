//! Per-touch session state.

use crate::geometry::Point;

/// Host-assigned identifier, stable for the lifetime of one physical contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TouchId(pub u64);

impl From<u64> for TouchId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TouchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "touch#{}", self.0)
    }
}

/// What a touch is currently doing to the MIDI stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Voice {
    /// Contact is down but over no playable key.
    Idle,
    /// A note-on went out for `note` on `channel`; its note-off has not.
    Sounding { note: u8, channel: u8 },
    /// Resting on a key whose note has no MIDI representation. Nothing was sent.
    Muted { note: i32 },
}

impl Voice {
    /// Layout note the touch is resting on, whether or not it sounds.
    #[inline]
    pub fn layout_note(&self) -> Option<i32> {
        match *self {
            Voice::Idle => None,
            Voice::Sounding { note, .. } => Some(i32::from(note)),
            Voice::Muted { note } => Some(note),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TouchSession {
    id: TouchId,
    pub(crate) voice: Voice,
    pub(crate) last_position: Point,
}

impl TouchSession {
    pub(crate) fn new(id: TouchId, voice: Voice, position: Point) -> Self {
        Self {
            id,
            voice,
            last_position: position,
        }
    }

    #[inline]
    pub fn id(&self) -> TouchId {
        self.id
    }

    #[inline]
    pub fn voice(&self) -> Voice {
        self.voice
    }

    /// The sounding MIDI note, if any.
    #[inline]
    pub fn current_note(&self) -> Option<u8> {
        match self.voice {
            Voice::Sounding { note, .. } => Some(note),
            _ => None,
        }
    }

    #[inline]
    pub fn last_position(&self) -> Point {
        self.last_position
    }
}
