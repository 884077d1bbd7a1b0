//! Output device settings.

use crate::error::{Error, Result};
use crate::message::PressureMode;
use serde::{Deserialize, Serialize};

/// Device name tried first when none is configured.
pub const DEFAULT_DEVICE_NAME: &str = "LMMS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MidiOutputConfig {
    /// Preferred output port, matched case-insensitively as a substring.
    /// `None` takes the first port.
    pub device_name: Option<String>,
    /// Client name registered with the platform MIDI API.
    pub client_name: String,
    pub pressure_mode: PressureMode,
}

impl Default for MidiOutputConfig {
    fn default() -> Self {
        Self {
            device_name: Some(DEFAULT_DEVICE_NAME.to_string()),
            client_name: "mastergrid".to_string(),
            pressure_mode: PressureMode::default(),
        }
    }
}

impl MidiOutputConfig {
    pub fn with_device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = Some(name.into());
        self
    }

    pub fn first_available(mut self) -> Self {
        self.device_name = None;
        self
    }

    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = name.into();
        self
    }

    pub fn with_pressure_mode(mut self, mode: PressureMode) -> Self {
        self.pressure_mode = mode;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.client_name.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "client name must not be empty".to_string(),
            ));
        }
        if matches!(&self.device_name, Some(name) if name.trim().is_empty()) {
            return Err(Error::InvalidConfig(
                "device name must not be empty; use first_available() instead".to_string(),
            ));
        }
        Ok(())
    }
}
