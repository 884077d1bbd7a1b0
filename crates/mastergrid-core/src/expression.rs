//! Attack velocity and held-key pressure.
//!
//! With aftertouch enabled, expression comes from where the finger sits on the
//! key: the farther from the key's vertical center, the softer. Each unit of
//! distance costs `sensitivity` velocity units.

use crate::config::EngineConfig;
use crate::geometry::Point;
use crate::layout::KeyZone;
use crate::resolver::center_of;

/// One touch sample as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Touch {
    pub position: Point,
    /// Normalized contact force (0.0-1.0) when the input device reports one.
    pub pressure: Option<f32>,
}

impl Touch {
    #[inline]
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Point::new(x, y),
            pressure: None,
        }
    }

    #[inline]
    pub fn with_pressure(mut self, pressure: f32) -> Self {
        self.pressure = Some(pressure);
        self
    }
}

impl From<Point> for Touch {
    fn from(position: Point) -> Self {
        Self {
            position,
            pressure: None,
        }
    }
}

/// Velocity units lost at the touch's distance from the key center.
#[inline]
fn distance_penalty(config: &EngineConfig, zone: &KeyZone, touch: &Touch) -> i32 {
    let distance = (center_of(zone) - touch.position.y).abs();
    // Float-to-int `as` saturates, so huge distances cannot wrap
    (config.sensitivity * distance).round() as i32
}

/// Note-on velocity for a touch landing on `zone`, in `1..=127`.
///
/// Native pressure is only honoured with aftertouch off; with aftertouch on
/// the position along the key decides. Never below `min_velocity`.
pub fn velocity_on_attack(config: &EngineConfig, zone: &KeyZone, touch: &Touch) -> u8 {
    let base = i32::from(config.base_velocity);
    let velocity = match touch.pressure {
        Some(pressure) if !config.aftertouch => {
            let native = (pressure.clamp(0.0, 1.0) * 127.0).round() as i32;
            native.min(base)
        }
        _ if config.aftertouch => base - distance_penalty(config, zone, touch),
        _ => base,
    };
    velocity
        .max(i32::from(config.min_velocity))
        .clamp(1, 127) as u8
}

/// Pressure value for a touch held on `zone`, in `0..=127`.
///
/// Independent of the velocity the note started with.
pub fn pressure_on_hold(config: &EngineConfig, zone: &KeyZone, touch: &Touch) -> u8 {
    let base = i32::from(config.base_velocity);
    (base - distance_penalty(config, zone, touch)).clamp(0, 127) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::layout::Layout;

    // One 100x100 key centred at y = 50
    fn single_key(config: &EngineConfig) -> Layout {
        Layout::build(
            &config.clone().with_grid(1, 1),
            Rect::new(0.0, 0.0, 100.0, 100.0),
        )
    }

    #[test]
    fn test_base_velocity_without_aftertouch() {
        let config = EngineConfig::default().with_velocity(100);
        let layout = single_key(&config);
        let zone = &layout.zones()[0];

        assert_eq!(velocity_on_attack(&config, zone, &Touch::at(50.0, 50.0)), 100);
        assert_eq!(velocity_on_attack(&config, zone, &Touch::at(50.0, 1.0)), 100);
    }

    #[test]
    fn test_native_pressure_caps_velocity() {
        let config = EngineConfig::default().with_velocity(100);
        let layout = single_key(&config);
        let zone = &layout.zones()[0];

        let soft = Touch::at(50.0, 50.0).with_pressure(0.5);
        assert_eq!(velocity_on_attack(&config, zone, &soft), 64);

        let hard = Touch::at(50.0, 50.0).with_pressure(1.0);
        assert_eq!(velocity_on_attack(&config, zone, &hard), 100);

        let none = Touch::at(50.0, 50.0).with_pressure(0.0);
        assert_eq!(velocity_on_attack(&config, zone, &none), 1);
    }

    #[test]
    fn test_aftertouch_ignores_native_pressure() {
        let config = EngineConfig::default()
            .with_velocity(100)
            .with_aftertouch(true)
            .with_sensitivity(2.0);
        let layout = single_key(&config);
        let zone = &layout.zones()[0];

        let touch = Touch::at(50.0, 40.0).with_pressure(0.1);
        assert_eq!(velocity_on_attack(&config, zone, &touch), 80);
    }

    #[test]
    fn test_aftertouch_velocity_decrements_with_distance() {
        let config = EngineConfig::default()
            .with_velocity(127)
            .with_aftertouch(true)
            .with_sensitivity(3.0);
        let layout = single_key(&config);
        let zone = &layout.zones()[0];

        assert_eq!(velocity_on_attack(&config, zone, &Touch::at(10.0, 50.0)), 127);
        assert_eq!(velocity_on_attack(&config, zone, &Touch::at(10.0, 60.0)), 97);
        assert_eq!(velocity_on_attack(&config, zone, &Touch::at(10.0, 40.0)), 97);
        // Rounds to nearest: 3 * 2.5 = 7.5 -> 8
        assert_eq!(velocity_on_attack(&config, zone, &Touch::at(10.0, 52.5)), 119);
    }

    #[test]
    fn test_velocity_floor() {
        let config = EngineConfig::default()
            .with_velocity(100)
            .with_min_velocity(20)
            .with_aftertouch(true)
            .with_sensitivity(4.0);
        let layout = single_key(&config);
        let zone = &layout.zones()[0];

        assert_eq!(velocity_on_attack(&config, zone, &Touch::at(0.0, 0.0)), 20);
    }

    #[test]
    fn test_pressure_clamps_at_zero() {
        let config = EngineConfig::default()
            .with_velocity(127)
            .with_aftertouch(true)
            .with_sensitivity(4.0);
        let layout = single_key(&config);
        let zone = &layout.zones()[0];

        assert_eq!(pressure_on_hold(&config, zone, &Touch::at(0.0, 50.0)), 127);
        assert_eq!(pressure_on_hold(&config, zone, &Touch::at(0.0, 30.0)), 47);
        assert_eq!(pressure_on_hold(&config, zone, &Touch::at(0.0, 0.0)), 0);
        assert_eq!(pressure_on_hold(&config, zone, &Touch::at(0.0, 1.0e9)), 0);
    }
}
