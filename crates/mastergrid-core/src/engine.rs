//! Touch session tracker: turns down/move/up into note and pressure events.
//!
//! ## State per touch
//!
//! ```text
//! (none) --down on key--> Sounding --up--> (none)
//!                            |  ^
//!              move off keys |  | move onto key
//!                            v  |
//!                            Idle --up--> (none)
//! ```
//!
//! Moving between keys sends note-off for the old note before note-on for the
//! new one. Keys outside the MIDI note range park the touch in `Muted`, which
//! sends nothing.
//!
//! ## Concurrency
//!
//! Touch handlers take the gate shared and lock only their own session, so
//! different touches proceed in parallel. Reconfiguration takes the gate
//! exclusively: every sounding note is released before the new layout is
//! published, and no handler can see the table half-swept.

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::expression::{pressure_on_hold, velocity_on_attack, Touch};
use crate::geometry::Surface;
use crate::layout::{KeyZone, Layout};
use crate::message::MidiMessage;
use crate::session::{TouchId, TouchSession, Voice};
use crate::sink::MidiSink;
use arc_swap::ArcSwap;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Collects the outcome of one transition.
///
/// Every failure is logged; the first is handed back to the host.
#[derive(Default)]
struct Report {
    first: Option<Error>,
}

impl Report {
    fn record(&mut self, result: Result<()>) {
        if let Err(e) = result {
            warn!("{}", e);
            if self.first.is_none() {
                self.first = Some(e);
            }
        }
    }

    fn finish(self) -> Result<()> {
        match self.first {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Multitouch-to-MIDI engine.
///
/// Entry points return the first problem a transition hit (an unplayable note
/// or a sink failure) after the touch state has already been updated, so a
/// failed send never leaves the tracker out of step with the gesture.
///
/// # Example
/// ```
/// use mastergrid_core::{EngineConfig, Rect, RecordingSink, Touch, TouchEngine, TouchId};
///
/// let config = EngineConfig::default()
///     .with_grid(1, 3)
///     .with_low_note(60)
///     .with_interval(0)
///     .with_velocity(100);
/// let engine = TouchEngine::new(config, Rect::new(0.0, 0.0, 300.0, 100.0), RecordingSink::new())?;
///
/// engine.on_touch_down(TouchId(1), Touch::at(150.0, 50.0))?;
/// engine.on_touch_up(TouchId(1), Touch::at(150.0, 50.0))?;
/// assert_eq!(engine.sink().len(), 2);
/// # Ok::<(), mastergrid_core::Error>(())
/// ```
pub struct TouchEngine<S> {
    sink: S,
    config: ArcSwap<EngineConfig>,
    layout: ArcSwap<Layout>,
    sessions: DashMap<TouchId, TouchSession>,
    gate: RwLock<()>,
}

impl<S: MidiSink> TouchEngine<S> {
    pub fn new(config: EngineConfig, surface: Surface, sink: S) -> Result<Self> {
        config.validate()?;
        let layout = Layout::build(&config, surface);
        Ok(Self {
            sink,
            config: ArcSwap::from_pointee(config),
            layout: ArcSwap::from_pointee(layout),
            sessions: DashMap::new(),
            gate: RwLock::new(()),
        })
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn config(&self) -> Arc<EngineConfig> {
        self.config.load_full()
    }

    /// Current layout, for rendering. Never blocks.
    pub fn layout(&self) -> Arc<Layout> {
        self.layout.load_full()
    }

    pub fn active_touches(&self) -> usize {
        self.sessions.len()
    }

    pub fn session(&self, id: TouchId) -> Option<TouchSession> {
        self.sessions.get(&id).map(|session| session.value().clone())
    }

    /// Notes currently held down, ascending. A note held by two touches appears twice.
    pub fn sounding_notes(&self) -> Vec<u8> {
        let mut notes: Vec<u8> = self
            .sessions
            .iter()
            .filter_map(|entry| entry.current_note())
            .collect();
        notes.sort_unstable();
        notes
    }

    // =========================================================================
    // Touch entry points
    // =========================================================================

    pub fn on_touch_down(&self, id: TouchId, touch: Touch) -> Result<()> {
        let _gate = self.gate.read();
        let mut report = Report::default();

        if let Some((_, previous)) = self.sessions.remove(&id) {
            warn!(%id, "touch-down for a touch that is already down; releasing it first");
            self.stop_voice(previous.voice, &mut report);
        }

        let layout = self.layout.load();
        let Some(zone) = layout.resolve(touch.position) else {
            debug!(%id, x = touch.position.x, y = touch.position.y, "touch-down outside the keys");
            return report.finish();
        };

        let config = self.config.load();
        let voice = self.start_voice(&config, zone, &touch, &mut report);
        self.sessions
            .insert(id, TouchSession::new(id, voice, touch.position));
        report.finish()
    }

    pub fn on_touch_move(&self, id: TouchId, touch: Touch) -> Result<()> {
        let _gate = self.gate.read();
        let Some(mut session) = self.sessions.get_mut(&id) else {
            debug!(%id, "ignoring move for unknown touch");
            return Ok(());
        };
        session.last_position = touch.position;

        let layout = self.layout.load();
        let config = self.config.load();
        let zone = layout.resolve(touch.position);
        let mut report = Report::default();

        match zone {
            Some(zone) if session.voice.layout_note() == Some(zone.note()) => {
                if let Voice::Sounding { note, channel } = session.voice {
                    if config.aftertouch {
                        let value = pressure_on_hold(&config, zone, &touch);
                        report.record(self.sink.channel_pressure(channel, note, value));
                    }
                }
            }
            _ => {
                self.stop_voice(session.voice, &mut report);
                session.voice = match zone {
                    Some(zone) => self.start_voice(&config, zone, &touch, &mut report),
                    None => Voice::Idle,
                };
            }
        }
        report.finish()
    }

    pub fn on_touch_up(&self, id: TouchId, touch: Touch) -> Result<()> {
        let _gate = self.gate.read();
        let Some((_, session)) = self.sessions.remove(&id) else {
            debug!(%id, "ignoring release for unknown touch");
            return Ok(());
        };
        debug!(%id, x = touch.position.x, y = touch.position.y, "touch released");

        let mut report = Report::default();
        self.stop_voice(session.voice, &mut report);
        report.finish()
    }

    // =========================================================================
    // Reconfiguration
    // =========================================================================

    /// Replace the configuration and rebuild the layout.
    ///
    /// Every sounding touch gets its note-off before the new layout becomes
    /// visible; all sessions are discarded.
    pub fn rebuild_layout(&self, config: EngineConfig) -> Result<()> {
        config.validate()?;
        let _gate = self.gate.write();
        let mut report = Report::default();
        self.sweep(&mut report);
        self.install(config, self.layout.load().surface());
        report.finish()
    }

    /// Like [`rebuild_layout`](Self::rebuild_layout), but only when the grid
    /// itself changes. Channel and expression changes apply to live touches
    /// without releasing them; sounding notes still end on their own channel.
    pub fn apply_config(&self, config: EngineConfig) -> Result<()> {
        config.validate()?;
        let _gate = self.gate.write();
        if !self.config.load().requires_relayout(&config) {
            debug!(
                channel = config.channel,
                velocity = config.base_velocity,
                aftertouch = config.aftertouch,
                "expression settings updated"
            );
            self.config.store(Arc::new(config));
            return Ok(());
        }

        let mut report = Report::default();
        self.sweep(&mut report);
        self.install(config, self.layout.load().surface());
        report.finish()
    }

    /// Lay the same grid out on a new surface.
    ///
    /// Sessions keep their notes; the next move resolves against the new geometry.
    pub fn resize(&self, surface: Surface) {
        let _gate = self.gate.write();
        let config = self.config.load_full();
        self.layout.store(Arc::new(Layout::build(&config, surface)));
        debug!(
            width = surface.width(),
            height = surface.height(),
            "key layout resized"
        );
    }

    /// Release every sounding note and forget all touches.
    pub fn all_notes_off(&self) -> Result<()> {
        let _gate = self.gate.write();
        let mut report = Report::default();
        self.sweep(&mut report);
        report.finish()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn start_voice(
        &self,
        config: &EngineConfig,
        zone: &KeyZone,
        touch: &Touch,
        report: &mut Report,
    ) -> Voice {
        let velocity = velocity_on_attack(config, zone, touch);
        match MidiMessage::try_note_on(config.channel, zone.note(), velocity) {
            Ok(message) => {
                debug!(note = message.note(), velocity, channel = config.channel, "note on");
                report.record(self.sink.send(message));
                Voice::Sounding {
                    note: message.note(),
                    channel: message.channel(),
                }
            }
            Err(e) => {
                report.record(Err(e));
                Voice::Muted { note: zone.note() }
            }
        }
    }

    fn stop_voice(&self, voice: Voice, report: &mut Report) {
        if let Voice::Sounding { note, channel } = voice {
            debug!(note, channel, "note off");
            report.record(self.sink.note_off(channel, note, 0));
        }
    }

    /// Caller holds the gate exclusively.
    fn sweep(&self, report: &mut Report) {
        let released = self.sessions.len();
        self.sessions.retain(|_, session| {
            self.stop_voice(session.voice, report);
            false
        });
        if released > 0 {
            info!(touches = released, "released all touches");
        }
    }

    /// Caller holds the gate exclusively.
    fn install(&self, config: EngineConfig, surface: Surface) {
        let layout = Layout::build(&config, surface);
        info!(
            rows = layout.rows(),
            keys_per_row = layout.keys_per_row(),
            low_note = config.low_note,
            interval = config.interval,
            "key layout rebuilt"
        );
        self.layout.store(Arc::new(layout));
        self.config.store(Arc::new(config));
    }
}
