//! Engine configuration: grid shape, MIDI channel and expression parameters.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Largest grid (`rows * keys_per_row`) accepted by [`EngineConfig::validate`].
pub const MAX_KEYS: u64 = 1 << 20;

/// Everything the engine reads while translating touches.
///
/// Arrives from the host's settings layer and is replaced wholesale on change.
/// Call [`validate`](Self::validate) at the boundary; the engine refuses
/// configs that do not pass it.
///
/// # Example
/// ```
/// use mastergrid_core::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_grid(2, 25)
///     .with_low_note(24)
///     .with_interval(5)
///     .with_aftertouch(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of key rows. 0 yields an empty layout.
    pub rows: u32,
    /// Keys (consecutive semitones) per row. 0 yields an empty layout.
    pub keys_per_row: u32,
    /// Note number of the bottom-left key.
    pub low_note: u8,
    /// Semitones added to each row's first note, counting upward. May be zero or negative.
    pub interval: i32,
    /// MIDI channel (0-15).
    pub channel: u8,
    /// Attack velocity before any aftertouch reduction (1-127).
    pub base_velocity: u8,
    /// Floor for attack velocity (1..=base_velocity).
    pub min_velocity: u8,
    /// Reduce velocity and send pressure as the touch moves off a key's vertical center.
    pub aftertouch: bool,
    /// Velocity units lost per unit of vertical distance from the key center.
    pub sensitivity: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: 13,
            keys_per_row: 25,
            low_note: 24,
            interval: 5,
            channel: 0,
            base_velocity: 127,
            min_velocity: 1,
            aftertouch: false,
            sensitivity: 3.0,
        }
    }
}

impl EngineConfig {
    pub fn with_grid(mut self, rows: u32, keys_per_row: u32) -> Self {
        self.rows = rows;
        self.keys_per_row = keys_per_row;
        self
    }

    pub fn with_low_note(mut self, note: u8) -> Self {
        self.low_note = note;
        self
    }

    pub fn with_interval(mut self, semitones: i32) -> Self {
        self.interval = semitones;
        self
    }

    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.base_velocity = velocity;
        self
    }

    pub fn with_min_velocity(mut self, velocity: u8) -> Self {
        self.min_velocity = velocity;
        self
    }

    pub fn with_aftertouch(mut self, enabled: bool) -> Self {
        self.aftertouch = enabled;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let keys = u64::from(self.rows) * u64::from(self.keys_per_row);
        if keys > MAX_KEYS {
            return Err(Error::InvalidConfig(format!(
                "grid of {}x{} keys exceeds {} keys",
                self.rows, self.keys_per_row, MAX_KEYS
            )));
        }
        if self.low_note > 127 {
            return Err(Error::InvalidConfig(format!(
                "low note must be 0-127, got {}",
                self.low_note
            )));
        }
        if self.channel > 15 {
            return Err(Error::InvalidConfig(format!(
                "channel must be 0-15, got {}",
                self.channel
            )));
        }
        if !(1..=127).contains(&self.base_velocity) {
            return Err(Error::InvalidConfig(format!(
                "velocity must be 1-127, got {}",
                self.base_velocity
            )));
        }
        if self.min_velocity == 0 || self.min_velocity > self.base_velocity {
            return Err(Error::InvalidConfig(format!(
                "minimum velocity must be 1-{}, got {}",
                self.base_velocity, self.min_velocity
            )));
        }
        if !self.sensitivity.is_finite() || self.sensitivity <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "sensitivity must be a positive number, got {}",
                self.sensitivity
            )));
        }
        Ok(())
    }

    /// True when switching to `other` changes which note sits where.
    ///
    /// Channel, velocity, aftertouch and sensitivity can change under live
    /// touches; grid shape and note parameters cannot.
    pub fn requires_relayout(&self, other: &EngineConfig) -> bool {
        self.rows != other.rows
            || self.keys_per_row != other.keys_per_row
            || self.low_note != other.low_note
            || self.interval != other.interval
    }
}
