//! Register bus abstraction for I2C motion sensors
//!
//! Sensors on a two-wire bus are driven through single-byte register
//! reads and writes addressed to a 7-bit device address. This crate
//! provides:
//!
//! - [`RegisterBus`], the trait the sensor layer is written against
//! - [`I2cRegisterBus`], an implementation over any `embedded-hal` I2C bus
//! - [`open_bus`], which opens a Linux `/dev/i2c-N` node (feature `linux`)
//! - [`decode_word`], big-endian two's-complement decoding of register pairs

pub mod error;
mod i2c;

pub use error::TransportError;
pub use i2c::I2cRegisterBus;

#[cfg(all(feature = "linux", target_os = "linux"))]
pub use i2c::{open_bus, LinuxI2cBus};

/// Default Linux I2C bus node (Raspberry Pi header pins 3/5)
pub const DEFAULT_BUS_PATH: &str = "/dev/i2c-1";

/// The core bus trait - all backends implement this
///
/// Each call is one complete bus transaction. No retry happens at this
/// layer; callers decide what a failure means.
pub trait RegisterBus {
    /// Read one byte from `register` of the device at `address`
    fn read_byte(&mut self, address: u8, register: u8) -> Result<u8, TransportError>;

    /// Write `value` into `register` of the device at `address`
    fn write_byte(&mut self, address: u8, register: u8, value: u8) -> Result<(), TransportError>;
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    fn read_byte(&mut self, address: u8, register: u8) -> Result<u8, TransportError> {
        (**self).read_byte(address, register)
    }

    fn write_byte(&mut self, address: u8, register: u8, value: u8) -> Result<(), TransportError> {
        (**self).write_byte(address, register, value)
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for Box<B> {
    fn read_byte(&mut self, address: u8, register: u8) -> Result<u8, TransportError> {
        (**self).read_byte(address, register)
    }

    fn write_byte(&mut self, address: u8, register: u8, value: u8) -> Result<(), TransportError> {
        (**self).write_byte(address, register, value)
    }
}

/// Decode a big-endian register pair as a signed 16-bit value
///
/// Values at or above 0x8000 are negative: `-((65535 - v) + 1)`.
pub fn decode_word(high: u8, low: u8) -> i16 {
    i16::from_be_bytes([high, low])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_word_known_values() {
        assert_eq!(decode_word(0x00, 0x00), 0);
        assert_eq!(decode_word(0x7F, 0xFF), 32767);
        assert_eq!(decode_word(0x80, 0x00), -32768);
        assert_eq!(decode_word(0xFF, 0xFF), -1);
        assert_eq!(decode_word(0x40, 0x00), 16384);
    }

    #[test]
    fn test_decode_word_matches_reference_formula() {
        for raw in 0..=u16::MAX {
            let expected = if raw >= 0x8000 {
                -((65535 - raw as i32) + 1)
            } else {
                raw as i32
            };
            let [high, low] = raw.to_be_bytes();
            assert_eq!(decode_word(high, low) as i32, expected, "raw 0x{raw:04X}");
        }
    }
}
