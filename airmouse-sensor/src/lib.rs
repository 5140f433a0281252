//! MPU-6050 accelerometer interface
//!
//! Brings the sensor up over any [`airmouse_transport::RegisterBus`],
//! reads the accelerometer in g, and measures the static resting offset
//! used to debias readings.

pub mod calibration;
pub mod error;
pub mod registers;
pub mod sensor;
pub mod types;

pub use calibration::Calibrator;
pub use error::SensorError;
pub use registers::DEFAULT_ADDRESS;
pub use sensor::{AccelerationSource, Mpu6050};
pub use types::{
    AccelRange, AccelVector, CalibrationOffset, GyroRange, RawSample, SensorConfig,
};
