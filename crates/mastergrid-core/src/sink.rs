//! The outbound MIDI interface and two in-process implementations.
//!
//! Hardware output lives in `mastergrid-midi-io`; here are the trait, a
//! recording sink for tests and batching hosts, and a channel sink that hands
//! messages to another thread.

use crate::error::{Error, Result};
use crate::message::MidiMessage;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receives the engine's note and expression events.
///
/// Calls arrive synchronously from whichever thread delivers touches, and may
/// arrive while the engine holds a per-touch lock: implementations must not
/// call back into the engine. Return [`Error::SinkUnavailable`] instead of
/// retrying when the destination cannot take the event.
pub trait MidiSink: Send + Sync {
    fn note_on(&self, channel: u8, note: u8, velocity: u8) -> Result<()>;

    fn note_off(&self, channel: u8, note: u8, velocity: u8) -> Result<()>;

    /// Aftertouch for a held note.
    fn channel_pressure(&self, channel: u8, note: u8, value: u8) -> Result<()>;

    fn send(&self, message: MidiMessage) -> Result<()> {
        match message {
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => self.note_on(channel, note, velocity),
            MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            } => self.note_off(channel, note, velocity),
            MidiMessage::Pressure {
                channel,
                note,
                value,
            } => self.channel_pressure(channel, note, value),
        }
    }
}

impl<S: MidiSink + ?Sized> MidiSink for Arc<S> {
    fn note_on(&self, channel: u8, note: u8, velocity: u8) -> Result<()> {
        (**self).note_on(channel, note, velocity)
    }

    fn note_off(&self, channel: u8, note: u8, velocity: u8) -> Result<()> {
        (**self).note_off(channel, note, velocity)
    }

    fn channel_pressure(&self, channel: u8, note: u8, value: u8) -> Result<()> {
        (**self).channel_pressure(channel, note, value)
    }
}

impl<S: MidiSink + ?Sized> MidiSink for Box<S> {
    fn note_on(&self, channel: u8, note: u8, velocity: u8) -> Result<()> {
        (**self).note_on(channel, note, velocity)
    }

    fn note_off(&self, channel: u8, note: u8, velocity: u8) -> Result<()> {
        (**self).note_off(channel, note, velocity)
    }

    fn channel_pressure(&self, channel: u8, note: u8, value: u8) -> Result<()> {
        (**self).channel_pressure(channel, note, value)
    }
}

/// Stores every accepted message in order.
///
/// Can be switched unavailable to simulate a disconnected device; rejected
/// messages are not recorded.
pub struct RecordingSink {
    messages: Mutex<Vec<MidiMessage>>,
    available: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    /// Snapshot of everything recorded so far.
    pub fn messages(&self) -> Vec<MidiMessage> {
        self.messages.lock().clone()
    }

    /// Drain the recorded messages.
    pub fn take(&self) -> Vec<MidiMessage> {
        std::mem::take(&mut *self.messages.lock())
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    fn record(&self, message: MidiMessage) -> Result<()> {
        if !self.is_available() {
            return Err(Error::SinkUnavailable("recording sink offline".to_string()));
        }
        self.messages.lock().push(message);
        Ok(())
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MidiSink for RecordingSink {
    fn note_on(&self, channel: u8, note: u8, velocity: u8) -> Result<()> {
        self.record(MidiMessage::note_on(channel, note, velocity))
    }

    fn note_off(&self, channel: u8, note: u8, velocity: u8) -> Result<()> {
        self.record(MidiMessage::NoteOff {
            channel,
            note,
            velocity,
        })
    }

    fn channel_pressure(&self, channel: u8, note: u8, value: u8) -> Result<()> {
        self.record(MidiMessage::pressure(channel, note, value))
    }
}

/// Forwards messages over a bounded channel without blocking.
///
/// A full or disconnected channel is reported as [`Error::SinkUnavailable`].
#[derive(Clone)]
pub struct ChannelSink {
    sender: Sender<MidiMessage>,
}

impl ChannelSink {
    pub fn bounded(capacity: usize) -> (Self, Receiver<MidiMessage>) {
        let (sender, receiver) = bounded(capacity);
        (Self { sender }, receiver)
    }

    fn forward(&self, message: MidiMessage) -> Result<()> {
        self.sender.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => Error::SinkUnavailable("MIDI message queue full".to_string()),
            TrySendError::Disconnected(_) => {
                Error::SinkUnavailable("MIDI message receiver dropped".to_string())
            }
        })
    }
}

impl MidiSink for ChannelSink {
    fn note_on(&self, channel: u8, note: u8, velocity: u8) -> Result<()> {
        self.forward(MidiMessage::note_on(channel, note, velocity))
    }

    fn note_off(&self, channel: u8, note: u8, velocity: u8) -> Result<()> {
        self.forward(MidiMessage::NoteOff {
            channel,
            note,
            velocity,
        })
    }

    fn channel_pressure(&self, channel: u8, note: u8, value: u8) -> Result<()> {
        self.forward(MidiMessage::pressure(channel, note, value))
    }
}
