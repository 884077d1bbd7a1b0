//! Builder for configuring and constructing a `MasterGrid`.

use std::sync::Arc;

use crate::core::{EngineConfig, MidiSink, Surface, TouchEngine, DEFAULT_SURFACE};
use crate::{MasterGrid, Result};

#[cfg(feature = "midi-hardware")]
use crate::midi::{MidiOutputConfig, MidiOutputManager};
#[cfg(feature = "midi-hardware")]
use tracing::{info, warn};

/// Events go to the supplied [`sink`](Self::sink) when there is one; otherwise
/// a hardware output is opened (feature `midi-hardware`).
///
/// An output device that cannot be opened does not fail the build: the grid
/// comes up silent and reports the sink unavailable until
/// [`MasterGrid::connect_output`] succeeds.
///
/// # Example
///
/// ```ignore
/// use mastergrid::prelude::*;
///
/// let grid = MasterGrid::builder()
///     .config(EngineConfig::default().with_interval(7))
///     .surface(Rect::new(0.0, 0.0, 1280.0, 800.0))
///     .midi_output(MidiOutputConfig::default().with_device_name("FluidSynth"))
///     .build()?;
/// ```
pub struct MasterGridBuilder {
    config: EngineConfig,
    surface: Surface,
    sink: Option<Arc<dyn MidiSink>>,

    #[cfg(feature = "midi-hardware")]
    midi_output: Option<MidiOutputConfig>,
}

impl Default for MasterGridBuilder {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            surface: DEFAULT_SURFACE,
            sink: None,

            #[cfg(feature = "midi-hardware")]
            midi_output: None,
        }
    }
}

impl MasterGridBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Default: 800x600 at the origin
    pub fn surface(mut self, surface: Surface) -> Self {
        self.surface = surface;
        self
    }

    /// Send events here instead of a hardware port.
    pub fn sink(mut self, sink: Arc<dyn MidiSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Output device settings. Ignored when a sink is supplied.
    #[cfg(feature = "midi-hardware")]
    pub fn midi_output(mut self, config: MidiOutputConfig) -> Self {
        self.midi_output = Some(config);
        self
    }

    pub fn build(mut self) -> Result<MasterGrid> {
        if let Some(sink) = self.sink.take() {
            let engine = TouchEngine::new(self.config, self.surface, sink)?;
            return Ok(MasterGrid::from_engine(engine));
        }
        self.build_with_output()
    }

    #[cfg(feature = "midi-hardware")]
    fn build_with_output(self) -> Result<MasterGrid> {
        let output_config = self.midi_output.unwrap_or_default();
        let output = Arc::new(MidiOutputManager::new(&output_config)?);
        match output.connect_preferred(output_config.device_name.as_deref()) {
            Ok(name) => info!(device = %name, "MIDI output ready"),
            Err(e) => warn!("starting without MIDI output: {}", e),
        }

        let sink: Arc<dyn MidiSink> = output.clone();
        let engine = TouchEngine::new(self.config, self.surface, sink)?;
        Ok(MasterGrid::from_engine(engine).with_output(output))
    }

    #[cfg(not(feature = "midi-hardware"))]
    fn build_with_output(self) -> Result<MasterGrid> {
        Err(crate::core::Error::InvalidConfig(
            "no MIDI sink supplied and hardware output is disabled".to_string(),
        )
        .into())
    }
}
