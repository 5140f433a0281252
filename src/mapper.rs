//! Acceleration-to-pointer mapping
//!
//! Converts a debiased accelerometer reading into a relative pointer
//! movement: subtract the resting offset, drop small values, scale.

use airmouse_sensor::{AccelVector, CalibrationOffset};

/// Readings below this magnitude (in g, after debiasing) are treated as zero
pub const DEFAULT_DEAD_ZONE: f64 = 0.05;
/// Pixels per g
pub const DEFAULT_SENSITIVITY: f64 = 25.0;

/// Relative pointer movement for one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerDelta {
    pub x: i32,
    pub y: i32,
}

impl PointerDelta {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True when neither axis moves
    pub fn is_idle(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

/// Linear gain with a fixed dead zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMapper {
    /// Dead zone in g (strict: values with `abs < dead_zone` are zeroed)
    pub dead_zone: f64,
    /// Output pixels per g
    pub sensitivity: f64,
}

impl Default for PointerMapper {
    fn default() -> Self {
        Self {
            dead_zone: DEFAULT_DEAD_ZONE,
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

impl PointerMapper {
    pub fn new(dead_zone: f64, sensitivity: f64) -> Self {
        Self {
            dead_zone,
            sensitivity,
        }
    }

    /// Map one reading to a pointer delta (Z is ignored)
    pub fn map(&self, raw: AccelVector, offset: CalibrationOffset) -> PointerDelta {
        let x = apply_dead_zone(raw.x - offset.x, self.dead_zone);
        let y = apply_dead_zone(raw.y - offset.y, self.dead_zone);

        PointerDelta {
            x: scale(x, self.sensitivity),
            y: scale(y, self.sensitivity),
        }
    }
}

/// Map with the default dead zone and sensitivity
pub fn map_to_pointer(raw: AccelVector, offset: CalibrationOffset) -> PointerDelta {
    PointerMapper::default().map(raw, offset)
}

fn apply_dead_zone(value: f64, dead_zone: f64) -> f64 {
    if value.abs() < dead_zone {
        0.0
    } else {
        value
    }
}

/// Scale and truncate toward zero (not rounding: 1.5 -> 1, -1.5 -> -1)
fn scale(value: f64, sensitivity: f64) -> i32 {
    (value * sensitivity) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accel(x: f64, y: f64) -> AccelVector {
        AccelVector::new(x, y, 1.0)
    }

    #[test]
    fn test_at_rest_is_idle() {
        let delta = map_to_pointer(accel(0.0, 0.0), CalibrationOffset::ZERO);
        assert_eq!(delta, PointerDelta::new(0, 0));
        assert!(delta.is_idle());
    }

    #[test]
    fn test_offset_is_subtracted() {
        let offset = CalibrationOffset::new(0.125, -0.25);
        let delta = map_to_pointer(accel(0.125, -0.25), offset);
        assert!(delta.is_idle());

        // Debiased (0.5, 0.5) -> 12.5 -> 12
        let delta = map_to_pointer(accel(0.625, 0.25), offset);
        assert_eq!(delta, PointerDelta::new(12, 12));
    }

    #[test]
    fn test_dead_zone_boundary_is_strict() {
        // Exactly at the threshold survives and scales to int(0.05 * 25) = 1
        let delta = map_to_pointer(accel(0.05, -0.05), CalibrationOffset::ZERO);
        assert_eq!(delta, PointerDelta::new(1, -1));

        let delta = map_to_pointer(accel(0.0499999, -0.0499999), CalibrationOffset::ZERO);
        assert_eq!(delta, PointerDelta::new(0, 0));
    }

    #[test]
    fn test_axes_are_independent() {
        let delta = map_to_pointer(accel(0.2, 0.01), CalibrationOffset::ZERO);
        assert_eq!(delta, PointerDelta::new(5, 0));
    }

    #[test]
    fn test_truncates_toward_zero() {
        // 0.06 * 25 = 1.5
        let delta = map_to_pointer(accel(0.06, -0.06), CalibrationOffset::ZERO);
        assert_eq!(delta, PointerDelta::new(1, -1));

        // Fractions below one pixel vanish in both directions
        let unit = PointerMapper::new(0.05, 1.0);
        let delta = unit.map(accel(0.9, -0.9), CalibrationOffset::ZERO);
        assert_eq!(delta, PointerDelta::new(0, 0));
    }

    #[test]
    fn test_custom_parameters() {
        let mapper = PointerMapper::new(0.2, 100.0);
        assert!(mapper.map(accel(0.15, 0.0), CalibrationOffset::ZERO).is_idle());
        assert_eq!(
            mapper.map(accel(0.25, -1.0), CalibrationOffset::ZERO),
            PointerDelta::new(25, -100)
        );
    }
}
