//! Sensor interface error types

use airmouse_transport::TransportError;
use thiserror::Error;

/// Errors from sensor operations
#[derive(Error, Debug)]
pub enum SensorError {
    /// Transport layer error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Stopped by an interrupt before finishing
    #[error("Cancelled")]
    Cancelled,
}

impl SensorError {
    /// The underlying transport error, if any
    pub fn transport(&self) -> Option<&TransportError> {
        match self {
            SensorError::Transport(e) => Some(e),
            _ => None,
        }
    }
}
