//! Top-level error type and process exit codes

use airmouse_sensor::SensorError;
use airmouse_transport::TransportError;
use thiserror::Error;

use crate::pointer::PointerError;

/// Exit code for a bad config file or flag
pub const EXIT_CONFIG: u8 = 1;
/// Exit code for bus or sensor failures
pub const EXIT_SENSOR: u8 = 2;
/// Exit code when the virtual device cannot be created
pub const EXIT_DEVICE: u8 = 3;
/// Exit code when writing events to an existing device fails
pub const EXIT_EMIT: u8 = 4;

/// Errors that end a run
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bus error: {0}")]
    Bus(#[from] TransportError),

    #[error("Sensor error: {0}")]
    Sensor(#[from] SensorError),

    #[error("Virtual mouse error: {0}")]
    Pointer(#[from] PointerError),
}

impl AppError {
    /// Wrap a config load/validate failure, keeping its context chain
    pub fn config(err: anyhow::Error) -> Self {
        AppError::Config(format!("{err:#}"))
    }

    /// Process exit code for this error (never 0)
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => EXIT_CONFIG,
            AppError::Bus(_) | AppError::Sensor(_) => EXIT_SENSOR,
            AppError::Pointer(PointerError::CreateDevice(_)) => EXIT_DEVICE,
            AppError::Pointer(PointerError::EmitEvent(_)) => EXIT_EMIT,
        }
    }

    /// Remediation hint for the operator, if there is an obvious one
    pub fn hint(&self) -> Option<&'static str> {
        let transport = match self {
            AppError::Bus(e) => Some(e),
            AppError::Sensor(e) => e.transport(),
            _ => None,
        };

        match (self, transport) {
            (AppError::Pointer(PointerError::CreateDevice(_)), _) => {
                Some("Ensure /dev/uinput exists (modprobe uinput) and has proper permissions.")
            }
            (_, Some(TransportError::BusNotFound(_))) => {
                Some("Enable I2C (e.g. raspi-config) and check the bus number with `i2cdetect -l`.")
            }
            (_, Some(TransportError::PermissionDenied(_))) => {
                Some("Add this user to the `i2c` group or run with sufficient privileges.")
            }
            (_, Some(TransportError::NoAcknowledge { .. })) => {
                Some("Check sensor wiring and address with `i2cdetect -y <bus>`.")
            }
            _ => None,
        }
    }
}
