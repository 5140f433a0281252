//! Transport error types

use embedded_hal::i2c::ErrorKind;
use thiserror::Error;

/// Errors that can occur during register bus operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("I2C bus not found: {0}")]
    BusNotFound(String),

    #[error("I2C permission denied: {0}")]
    PermissionDenied(String),

    /// Nothing answered at the address (device absent or unpowered)
    #[error("No acknowledge from device at 0x{address:02X}")]
    NoAcknowledge { address: u8 },

    /// Another master won arbitration (bus busy)
    #[error("I2C arbitration lost at 0x{address:02X}")]
    ArbitrationLoss { address: u8 },

    #[error("I2C bus error at 0x{address:02X}: {message}")]
    Bus { address: u8, message: String },
}

impl TransportError {
    /// Classify an embedded-hal I2C error for a transaction with `address`
    pub fn from_i2c<E: embedded_hal::i2c::Error>(address: u8, error: E) -> Self {
        match error.kind() {
            ErrorKind::NoAcknowledge(_) => TransportError::NoAcknowledge { address },
            ErrorKind::ArbitrationLoss => TransportError::ArbitrationLoss { address },
            kind => TransportError::Bus {
                address,
                message: format!("{kind:?}: {error:?}"),
            },
        }
    }

    /// Classify a failure to open the bus device node
    pub fn from_open_error(path: &str, error: impl std::fmt::Display) -> Self {
        let msg = format!("{path}: {error}");
        if msg.contains("Permission denied") || msg.contains("EACCES") {
            TransportError::PermissionDenied(msg)
        } else if msg.contains("No such file") || msg.contains("ENOENT") {
            TransportError::BusNotFound(msg)
        } else {
            TransportError::Bus {
                address: 0,
                message: msg,
            }
        }
    }

    /// Whether retrying the same transaction could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TransportError::ArbitrationLoss { .. } | TransportError::Bus { .. }
        )
    }
}
