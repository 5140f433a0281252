//! Sample and configuration types

use serde::{Deserialize, Serialize};

/// Accelerometer full-scale range (ACCEL_CONFIG bits 4:3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccelRange {
    G2,
    G4,
    #[default]
    G8,
    G16,
}

impl AccelRange {
    /// Value written to ACCEL_CONFIG
    pub const fn config_bits(self) -> u8 {
        match self {
            AccelRange::G2 => 0x00,
            AccelRange::G4 => 0x08,
            AccelRange::G8 => 0x10,
            AccelRange::G16 => 0x18,
        }
    }

    /// Raw counts per g
    pub const fn lsb_per_g(self) -> f64 {
        match self {
            AccelRange::G2 => 16384.0,
            AccelRange::G4 => 8192.0,
            AccelRange::G8 => 4096.0,
            AccelRange::G16 => 2048.0,
        }
    }
}

/// Gyroscope full-scale range (GYRO_CONFIG bits 4:3)
///
/// Configured at startup but never read back by the pointer pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GyroRange {
    #[default]
    Dps250,
    Dps500,
    Dps1000,
    Dps2000,
}

impl GyroRange {
    /// Value written to GYRO_CONFIG
    pub const fn config_bits(self) -> u8 {
        match self {
            GyroRange::Dps250 => 0x00,
            GyroRange::Dps500 => 0x08,
            GyroRange::Dps1000 => 0x10,
            GyroRange::Dps2000 => 0x18,
        }
    }
}

/// Full-scale settings applied when the sensor is brought up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SensorConfig {
    #[serde(default)]
    pub accel_range: AccelRange,
    #[serde(default)]
    pub gyro_range: GyroRange,
}

/// Raw accelerometer counts, one read of the output registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl RawSample {
    /// Convert counts to g for the given range (no clamping)
    pub fn to_accel(self, range: AccelRange) -> AccelVector {
        let lsb = range.lsb_per_g();
        AccelVector {
            x: self.x as f64 / lsb,
            y: self.y as f64 / lsb,
            z: self.z as f64 / lsb,
        }
    }
}

/// Acceleration in g
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AccelVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AccelVector {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Resting bias of the X/Y axes, in g
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalibrationOffset {
    pub x: f64,
    pub y: f64,
}

impl CalibrationOffset {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_range_is_8g() {
        let range = AccelRange::default();
        assert_eq!(range.config_bits(), 0x10);
        assert_eq!(range.lsb_per_g(), 4096.0);
        assert_eq!(GyroRange::default().config_bits(), 0x00);
    }

    #[test]
    fn test_to_accel_divides_by_4096() {
        let raw = RawSample {
            x: 2458,
            y: -4096,
            z: 0x4000,
        };
        let accel = raw.to_accel(AccelRange::G8);
        assert_eq!(accel.x, 2458.0 / 4096.0);
        assert_eq!(accel.y, -1.0);
        assert_eq!(accel.z, 4.0);
    }

    #[test]
    fn test_to_accel_extremes_not_clamped() {
        let raw = RawSample {
            x: i16::MIN,
            y: i16::MAX,
            z: 0,
        };
        let accel = raw.to_accel(AccelRange::G8);
        assert_eq!(accel.x, -8.0);
        assert_eq!(accel.y, 32767.0 / 4096.0);
    }
}
