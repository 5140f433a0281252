//! I2C register bus over embedded-hal
//!
//! Works with any `embedded_hal::i2c::I2c` implementation. On Linux the
//! concrete bus is `linux_embedded_hal::I2cdev` (an `/dev/i2c-N` node).

use embedded_hal::i2c::I2c;
use tracing::trace;

use crate::error::TransportError;
use crate::RegisterBus;

/// Register access on top of a raw I2C bus
pub struct I2cRegisterBus<I> {
    i2c: I,
}

impl<I: I2c> I2cRegisterBus<I> {
    /// Wrap an I2C bus
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Get the underlying bus back
    pub fn into_inner(self) -> I {
        self.i2c
    }
}

impl<I: I2c> RegisterBus for I2cRegisterBus<I> {
    fn read_byte(&mut self, address: u8, register: u8) -> Result<u8, TransportError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(address, &[register], &mut buf)
            .map_err(|e| TransportError::from_i2c(address, e))?;
        trace!("i2c 0x{address:02X} read  [0x{register:02X}] = 0x{:02X}", buf[0]);
        Ok(buf[0])
    }

    fn write_byte(&mut self, address: u8, register: u8, value: u8) -> Result<(), TransportError> {
        self.i2c
            .write(address, &[register, value])
            .map_err(|e| TransportError::from_i2c(address, e))?;
        trace!("i2c 0x{address:02X} write [0x{register:02X}] = 0x{value:02X}");
        Ok(())
    }
}

/// Register bus on a Linux i2c-dev node
#[cfg(all(feature = "linux", target_os = "linux"))]
pub type LinuxI2cBus = I2cRegisterBus<linux_embedded_hal::I2cdev>;

/// Open a Linux I2C bus node (e.g. `/dev/i2c-1`)
///
/// The file handle is closed when the returned bus is dropped.
#[cfg(all(feature = "linux", target_os = "linux"))]
pub fn open_bus(path: &str) -> Result<LinuxI2cBus, TransportError> {
    let dev = linux_embedded_hal::I2cdev::new(path)
        .map_err(|e| TransportError::from_open_error(path, e))?;
    tracing::debug!("Opened I2C bus {}", path);
    Ok(I2cRegisterBus::new(dev))
}
