//! MIDI output: device enumeration, connection, and message sending via a dedicated thread.

use crate::config::MidiOutputConfig;
use crate::error::{Error, Result};
use crate::message::{MidiOutputMessage, PressureMode};
use arc_swap::ArcSwap;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use mastergrid_core::{MidiMessage, MidiSink};
use midir::{MidiOutput, MidiOutputConnection};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiOutputDevice {
    pub index: usize,
    pub name: String,
}

enum MidiOutputCommand {
    Connect {
        index: usize,
        reply: Sender<Result<String>>,
    },
    Disconnect,
    SendMessage(MidiOutputMessage),
    Shutdown,
}

/// Owns the platform connection on its own thread.
///
/// Sends are queued and never block. A failed send on the output thread drops
/// the connection, after which every send is rejected until the next
/// successful `connect`.
///
/// The message whose write fails was already accepted by
/// [`send_message`](Self::send_message), so it is lost without an error
/// reaching the caller. Only later sends report the device as gone; poll
/// [`is_connected`](Self::is_connected) to notice the drop sooner.
pub struct MidiOutputManager {
    command_sender: Sender<MidiOutputCommand>,
    connected_device: Arc<ArcSwap<Option<String>>>,
    is_connected: Arc<AtomicBool>,
    pressure_mode: PressureMode,
}

impl MidiOutputManager {
    pub fn new(config: &MidiOutputConfig) -> Result<Self> {
        config.validate()?;
        let (command_sender, command_receiver) = bounded(1024);
        let connected_device = Arc::new(ArcSwap::new(Arc::new(None)));
        let is_connected = Arc::new(AtomicBool::new(false));

        let connected_device_clone = Arc::clone(&connected_device);
        let is_connected_clone = Arc::clone(&is_connected);
        let client_name = config.client_name.clone();

        thread::Builder::new()
            .name("midi-output-thread".to_string())
            .spawn(move || {
                Self::midi_output_thread(
                    command_receiver,
                    client_name,
                    connected_device_clone,
                    is_connected_clone,
                );
            })?;

        Ok(Self {
            command_sender,
            connected_device,
            is_connected,
            pressure_mode: config.pressure_mode,
        })
    }

    fn midi_output_thread(
        command_receiver: Receiver<MidiOutputCommand>,
        client_name: String,
        connected_device: Arc<ArcSwap<Option<String>>>,
        is_connected: Arc<AtomicBool>,
    ) {
        let mut connection: Option<MidiOutputConnection> = None;
        let mark_disconnected = || {
            is_connected.store(false, Ordering::SeqCst);
            connected_device.store(Arc::new(None));
        };

        while let Ok(command) = command_receiver.recv() {
            match command {
                MidiOutputCommand::Connect { index, reply } => {
                    if connection.take().is_some() {
                        mark_disconnected();
                    }

                    let result = match Self::connect_to_device(&client_name, index) {
                        Ok((conn, name)) => {
                            connection = Some(conn);
                            connected_device.store(Arc::new(Some(name.clone())));
                            is_connected.store(true, Ordering::SeqCst);
                            Ok(name)
                        }
                        Err(e) => Err(e),
                    };
                    // Caller may have given up waiting
                    let _ = reply.send(result);
                }
                MidiOutputCommand::Disconnect => {
                    if connection.take().is_some() {
                        mark_disconnected();
                        info!("MIDI output disconnected");
                    }
                }
                MidiOutputCommand::SendMessage(msg) => {
                    if let Some(conn) = connection.as_mut() {
                        if let Err(e) = conn.send(&msg.bytes) {
                            warn!("MIDI send failed, dropping connection: {}", e);
                            connection = None;
                            mark_disconnected();
                        }
                    } else {
                        debug!("Cannot send MIDI message: no device connected");
                    }
                }
                MidiOutputCommand::Shutdown => break,
            }
        }
        mark_disconnected();
    }

    fn connect_to_device(
        client_name: &str,
        device_index: usize,
    ) -> Result<(MidiOutputConnection, String)> {
        let midi_output = MidiOutput::new(client_name)?;

        let ports = midi_output.ports();
        let port = ports.get(device_index).ok_or_else(|| {
            Error::MidiDevice(format!("MIDI output device {} not found", device_index))
        })?;

        let port_name = midi_output
            .port_name(port)
            .unwrap_or_else(|_| format!("Device {}", device_index));

        let connection = midi_output.connect(port, &format!("{}-output", client_name))?;

        Ok((connection, port_name))
    }

    /// Output ports visible right now. Empty when the platform API is unavailable.
    pub fn list_devices() -> Vec<MidiOutputDevice> {
        let mut devices = Vec::new();
        if let Ok(midi_output) = MidiOutput::new("mastergrid-device-list") {
            let ports = midi_output.ports();
            for (index, port) in ports.iter().enumerate() {
                let name = midi_output
                    .port_name(port)
                    .unwrap_or_else(|_| format!("Unknown Device {}", index));
                devices.push(MidiOutputDevice { index, name });
            }
        }
        devices
    }

    /// Connect to the port at `device_index`, replacing any current connection.
    /// Returns the port name.
    pub fn connect(&self, device_index: usize) -> Result<String> {
        let (reply, response) = bounded(1);
        self.command_sender
            .send(MidiOutputCommand::Connect {
                index: device_index,
                reply,
            })
            .map_err(|_| Error::MidiDevice("MIDI output thread not running".to_string()))?;

        let name = response
            .recv()
            .map_err(|_| Error::MidiDevice("MIDI output thread not running".to_string()))??;
        info!(device = %name, "MIDI output connected");
        Ok(name)
    }

    pub fn connect_by_name(&self, name: &str) -> Result<String> {
        let devices = Self::list_devices();
        let device = find_device(&devices, name).ok_or_else(|| {
            Error::MidiDevice(format!("No MIDI output device found matching '{}'", name))
        })?;
        self.connect(device.index)
    }

    /// Connect to the port matching `name`, or the first port when there is
    /// no match or no name.
    pub fn connect_preferred(&self, name: Option<&str>) -> Result<String> {
        let devices = Self::list_devices();
        let device = select_device(&devices, name)?;
        self.connect(device.index)
    }

    pub fn disconnect(&self) {
        let _ = self.command_sender.send(MidiOutputCommand::Disconnect);
    }

    /// Queue raw bytes for the output thread.
    pub fn send_message(&self, message: MidiOutputMessage) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::MidiDevice(
                "no MIDI output device connected".to_string(),
            ));
        }
        self.command_sender
            .try_send(MidiOutputCommand::SendMessage(message))
            .map_err(|e| match e {
                TrySendError::Full(_) => Error::MidiPort("MIDI output queue full".to_string()),
                TrySendError::Disconnected(_) => {
                    Error::MidiDevice("MIDI output thread not running".to_string())
                }
            })
    }

    pub fn pressure_mode(&self) -> PressureMode {
        self.pressure_mode
    }

    /// Wire bytes for an engine message, with pressure in this output's mode.
    pub fn frame(&self, message: &MidiMessage) -> MidiOutputMessage {
        MidiOutputMessage::from_message(message, self.pressure_mode())
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected.load(Ordering::SeqCst)
    }

    pub fn connected_device_name(&self) -> Option<String> {
        self.connected_device.load().as_ref().clone()
    }
}

impl Drop for MidiOutputManager {
    fn drop(&mut self) {
        // Queued sends ahead of this still go out
        let _ = self.command_sender.send(MidiOutputCommand::Shutdown);
    }
}

impl MidiSink for MidiOutputManager {
    fn note_on(&self, channel: u8, note: u8, velocity: u8) -> mastergrid_core::Result<()> {
        self.send(MidiMessage::note_on(channel, note, velocity))
    }

    fn note_off(&self, channel: u8, note: u8, velocity: u8) -> mastergrid_core::Result<()> {
        self.send(MidiMessage::NoteOff {
            channel,
            note,
            velocity,
        })
    }

    fn channel_pressure(&self, channel: u8, note: u8, value: u8) -> mastergrid_core::Result<()> {
        self.send(MidiMessage::pressure(channel, note, value))
    }

    fn send(&self, message: MidiMessage) -> mastergrid_core::Result<()> {
        Ok(self.send_message(self.frame(&message))?)
    }
}

fn find_device<'a>(devices: &'a [MidiOutputDevice], name: &str) -> Option<&'a MidiOutputDevice> {
    let name = name.to_lowercase();
    devices
        .iter()
        .find(|d| d.name.to_lowercase().contains(&name))
}

fn select_device<'a>(
    devices: &'a [MidiOutputDevice],
    name: Option<&str>,
) -> Result<&'a MidiOutputDevice> {
    let first = devices
        .first()
        .ok_or_else(|| Error::MidiDevice("no MIDI output devices available".to_string()))?;

    let Some(name) = name else {
        return Ok(first);
    };
    match find_device(devices, name) {
        Some(device) => Ok(device),
        None => {
            warn!(
                wanted = name,
                fallback = %first.name,
                "MIDI output device not found, using first available"
            );
            Ok(first)
        }
    }
}
