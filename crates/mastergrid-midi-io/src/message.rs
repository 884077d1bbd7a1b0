//! Wire framing for outbound messages.

use mastergrid_core::MidiMessage;
use midi_msg::{Channel, ChannelVoiceMsg, MidiMsg};
use serde::{Deserialize, Serialize};

/// How held-key pressure is put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressureMode {
    /// Polyphonic key pressure (`0xA0`), one value per note.
    #[default]
    Poly,
    /// Channel pressure (`0xD0`); the note number is dropped.
    Channel,
}

/// Raw bytes of one channel-voice message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiOutputMessage {
    pub bytes: Vec<u8>,
}

impl MidiOutputMessage {
    pub fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        let channel = channel.min(15); // MIDI channels are 0-15
        let status = 0x90 | channel;
        Self {
            bytes: vec![status, note & 0x7F, velocity & 0x7F],
        }
    }

    pub fn note_off(channel: u8, note: u8, velocity: u8) -> Self {
        let channel = channel.min(15);
        let status = 0x80 | channel;
        Self {
            bytes: vec![status, note & 0x7F, velocity & 0x7F],
        }
    }

    pub fn poly_pressure(channel: u8, note: u8, pressure: u8) -> Self {
        let channel = channel.min(15);
        let status = 0xA0 | channel;
        Self {
            bytes: vec![status, note & 0x7F, pressure & 0x7F],
        }
    }

    pub fn channel_pressure(channel: u8, pressure: u8) -> Self {
        let channel = channel.min(15);
        let status = 0xD0 | channel;
        Self {
            bytes: vec![status, pressure & 0x7F],
        }
    }

    /// Frame an engine message, encoding pressure according to `mode`.
    pub fn from_message(message: &MidiMessage, mode: PressureMode) -> Self {
        let (channel, msg) = match *message {
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => (channel, ChannelVoiceMsg::NoteOn { note, velocity }),
            MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            } => (channel, ChannelVoiceMsg::NoteOff { note, velocity }),
            MidiMessage::Pressure {
                channel,
                note,
                value,
            } => match mode {
                PressureMode::Poly => (
                    channel,
                    ChannelVoiceMsg::PolyPressure {
                        note,
                        pressure: value,
                    },
                ),
                PressureMode::Channel => {
                    (channel, ChannelVoiceMsg::ChannelPressure { pressure: value })
                }
            },
        };
        let msg = MidiMsg::ChannelVoice {
            channel: Channel::from_u8(channel.min(15)),
            msg,
        };
        Self {
            bytes: msg.to_midi(),
        }
    }
}

impl From<MidiMessage> for MidiOutputMessage {
    fn from(message: MidiMessage) -> Self {
        Self::from_message(&message, PressureMode::default())
    }
}
