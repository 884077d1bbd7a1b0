//! MasterGrid facade over the touch engine and its MIDI output.

use std::sync::Arc;

use crate::core::{
    EngineConfig, Layout, MidiSink, Surface, Touch, TouchEngine, TouchId, TouchSession,
};
use crate::Result;
use tracing::warn;

#[cfg(feature = "midi-hardware")]
use crate::midi::{MidiOutputDevice, MidiOutputManager};

/// A running isomorphic keyboard: layout, touch tracking and MIDI output.
///
/// Touch entry points can be called from any thread. Dropping the grid
/// releases every sounding note before the output closes.
///
/// # Example
///
/// ```ignore
/// use mastergrid::prelude::*;
///
/// let recorder = Arc::new(RecordingSink::new());
/// let grid = MasterGrid::builder()
///     .config(EngineConfig::default().with_grid(1, 3).with_low_note(60))
///     .surface(Rect::new(0.0, 0.0, 300.0, 100.0))
///     .sink(recorder.clone())
///     .build()?;
///
/// grid.on_touch_down(TouchId(1), Touch::at(150.0, 50.0))?;
/// grid.on_touch_up(TouchId(1), Touch::at(150.0, 50.0))?;
/// ```
pub struct MasterGrid {
    engine: TouchEngine<Arc<dyn MidiSink>>,

    /// Hardware output, when the grid opened one itself
    #[cfg(feature = "midi-hardware")]
    output: Option<Arc<MidiOutputManager>>,
}

impl MasterGrid {
    pub fn builder() -> crate::MasterGridBuilder {
        crate::MasterGridBuilder::default()
    }

    pub(crate) fn from_engine(engine: TouchEngine<Arc<dyn MidiSink>>) -> Self {
        Self {
            engine,
            #[cfg(feature = "midi-hardware")]
            output: None,
        }
    }

    #[cfg(feature = "midi-hardware")]
    pub(crate) fn with_output(mut self, output: Arc<MidiOutputManager>) -> Self {
        self.output = Some(output);
        self
    }

    /// The underlying engine, for callers that need its full API.
    pub fn engine(&self) -> &TouchEngine<Arc<dyn MidiSink>> {
        &self.engine
    }

    // =========================================================================
    // Touch input
    // =========================================================================

    pub fn on_touch_down(&self, id: TouchId, touch: Touch) -> Result<()> {
        Ok(self.engine.on_touch_down(id, touch)?)
    }

    pub fn on_touch_move(&self, id: TouchId, touch: Touch) -> Result<()> {
        Ok(self.engine.on_touch_move(id, touch)?)
    }

    pub fn on_touch_up(&self, id: TouchId, touch: Touch) -> Result<()> {
        Ok(self.engine.on_touch_up(id, touch)?)
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Release everything and lay out the grid for `config`.
    pub fn rebuild_layout(&self, config: EngineConfig) -> Result<()> {
        Ok(self.engine.rebuild_layout(config)?)
    }

    /// Apply new settings, rebuilding only when the grid changes.
    pub fn apply_config(&self, config: EngineConfig) -> Result<()> {
        Ok(self.engine.apply_config(config)?)
    }

    pub fn resize(&self, surface: Surface) {
        self.engine.resize(surface);
    }

    /// Panic button.
    pub fn all_notes_off(&self) -> Result<()> {
        Ok(self.engine.all_notes_off()?)
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn config(&self) -> Arc<EngineConfig> {
        self.engine.config()
    }

    pub fn layout(&self) -> Arc<Layout> {
        self.engine.layout()
    }

    pub fn active_touches(&self) -> usize {
        self.engine.active_touches()
    }

    pub fn sounding_notes(&self) -> Vec<u8> {
        self.engine.sounding_notes()
    }

    pub fn session(&self, id: TouchId) -> Option<TouchSession> {
        self.engine.session(id)
    }

    // =========================================================================
    // MIDI output
    // =========================================================================

    #[cfg(feature = "midi-hardware")]
    pub fn output(&self) -> Option<&Arc<MidiOutputManager>> {
        self.output.as_ref()
    }

    #[cfg(feature = "midi-hardware")]
    pub fn list_output_devices() -> Vec<MidiOutputDevice> {
        MidiOutputManager::list_devices()
    }

    /// Reconnect the grid's own output, by name or to the first port.
    ///
    /// Fails when the grid was built around a caller-supplied sink.
    #[cfg(feature = "midi-hardware")]
    pub fn connect_output(&self, name: Option<&str>) -> Result<String> {
        let output = self.hardware_output()?;
        // Notes started on the old port would never see their note-off
        if let Err(e) = self.engine.all_notes_off() {
            warn!("could not release notes before reconnecting: {}", e);
        }
        Ok(output.connect_preferred(name)?)
    }

    #[cfg(feature = "midi-hardware")]
    pub fn disconnect_output(&self) -> Result<()> {
        let output = self.hardware_output()?;
        let released = self.engine.all_notes_off();
        output.disconnect();
        Ok(released?)
    }

    #[cfg(feature = "midi-hardware")]
    pub fn is_output_connected(&self) -> bool {
        self.output
            .as_ref()
            .map(|output| output.is_connected())
            .unwrap_or(false)
    }

    #[cfg(feature = "midi-hardware")]
    pub fn connected_device_name(&self) -> Option<String> {
        self.output
            .as_ref()
            .and_then(|output| output.connected_device_name())
    }

    #[cfg(feature = "midi-hardware")]
    fn hardware_output(&self) -> Result<&Arc<MidiOutputManager>> {
        self.output.as_ref().ok_or_else(|| {
            crate::midi::Error::MidiDevice("grid has no hardware output".to_string()).into()
        })
    }
}

impl Drop for MasterGrid {
    fn drop(&mut self) {
        if self.engine.active_touches() == 0 {
            return;
        }
        if let Err(e) = self.engine.all_notes_off() {
            warn!("notes left sounding at shutdown: {}", e);
        }
    }
}
