//! MPU-6050 accelerometer interface

use airmouse_transport::{decode_word, RegisterBus};
use tracing::info;

use crate::error::SensorError;
use crate::registers::{power, reg};
use crate::types::{AccelVector, RawSample, SensorConfig};

/// Anything that can produce an acceleration reading
///
/// Implemented by [`Mpu6050`]; the calibrator and the pointer loop only
/// depend on this.
pub trait AccelerationSource {
    /// Read the current acceleration vector in g
    fn read_acceleration(&mut self) -> Result<AccelVector, SensorError>;
}

impl<S: AccelerationSource + ?Sized> AccelerationSource for &mut S {
    fn read_acceleration(&mut self) -> Result<AccelVector, SensorError> {
        (**self).read_acceleration()
    }
}

/// MPU-6050 on a register bus
///
/// Owns the bus; dropping the sensor drops (and closes) it.
pub struct Mpu6050<B> {
    bus: B,
    address: u8,
    config: SensorConfig,
}

impl<B: RegisterBus> Mpu6050<B> {
    /// Wake the device and apply the full-scale ranges
    ///
    /// Writes PWR_MGMT_1, ACCEL_CONFIG and GYRO_CONFIG in that order.
    pub fn new(mut bus: B, address: u8, config: SensorConfig) -> Result<Self, SensorError> {
        bus.write_byte(address, reg::PWR_MGMT_1, power::WAKE_PLL_X)?;
        bus.write_byte(address, reg::ACCEL_CONFIG, config.accel_range.config_bits())?;
        bus.write_byte(address, reg::GYRO_CONFIG, config.gyro_range.config_bits())?;

        info!(
            "MPU-6050 at 0x{:02X} configured (accel {:?}, gyro {:?})",
            address, config.accel_range, config.gyro_range
        );

        Ok(Self {
            bus,
            address,
            config,
        })
    }

    /// Device address on the bus
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Read one signed register pair (high byte first)
    fn read_word(&mut self, high_reg: u8) -> Result<i16, SensorError> {
        let high = self.bus.read_byte(self.address, high_reg)?;
        let low = self.bus.read_byte(self.address, high_reg + 1)?;
        Ok(decode_word(high, low))
    }

    /// Read raw X/Y/Z accelerometer counts
    pub fn read_raw(&mut self) -> Result<RawSample, SensorError> {
        let x = self.read_word(reg::ACCEL_XOUT_H)?;
        let y = self.read_word(reg::ACCEL_YOUT_H)?;
        let z = self.read_word(reg::ACCEL_ZOUT_H)?;
        Ok(RawSample { x, y, z })
    }
}

impl<B: RegisterBus> AccelerationSource for Mpu6050<B> {
    fn read_acceleration(&mut self) -> Result<AccelVector, SensorError> {
        let raw = self.read_raw()?;
        Ok(raw.to_accel(self.config.accel_range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::DEFAULT_ADDRESS;
    use crate::types::{AccelRange, GyroRange};
    use airmouse_transport::TransportError;
    use std::collections::HashMap;

    /// In-memory register file that logs every transaction
    #[derive(Default)]
    struct FakeBus {
        registers: HashMap<u8, u8>,
        writes: Vec<(u8, u8, u8)>,
        reads: Vec<(u8, u8)>,
        fail_reads_at: Option<u8>,
    }

    impl RegisterBus for FakeBus {
        fn read_byte(&mut self, address: u8, register: u8) -> Result<u8, TransportError> {
            if self.fail_reads_at == Some(register) {
                return Err(TransportError::NoAcknowledge { address });
            }
            self.reads.push((address, register));
            Ok(self.registers.get(&register).copied().unwrap_or(0))
        }

        fn write_byte(&mut self, address: u8, register: u8, value: u8) -> Result<(), TransportError> {
            self.writes.push((address, register, value));
            self.registers.insert(register, value);
            Ok(())
        }
    }

    fn load_sample(bus: &mut FakeBus, x: u16, y: u16, z: u16) {
        for (high_reg, word) in [
            (reg::ACCEL_XOUT_H, x),
            (reg::ACCEL_YOUT_H, y),
            (reg::ACCEL_ZOUT_H, z),
        ] {
            let [high, low] = word.to_be_bytes();
            bus.registers.insert(high_reg, high);
            bus.registers.insert(high_reg + 1, low);
        }
    }

    #[test]
    fn test_init_sequence() {
        let mut bus = FakeBus::default();
        let sensor = Mpu6050::new(&mut bus, DEFAULT_ADDRESS, SensorConfig::default()).unwrap();
        drop(sensor);

        assert_eq!(
            bus.writes,
            vec![(0x68, 0x6B, 0x01), (0x68, 0x1C, 0x10), (0x68, 0x1B, 0x00)]
        );
    }

    #[test]
    fn test_init_sequence_other_ranges() {
        let mut bus = FakeBus::default();
        let config = SensorConfig {
            accel_range: AccelRange::G2,
            gyro_range: GyroRange::Dps2000,
        };
        Mpu6050::new(&mut bus, 0x69, config).unwrap();

        assert_eq!(
            bus.writes,
            vec![(0x69, 0x6B, 0x01), (0x69, 0x1C, 0x00), (0x69, 0x1B, 0x18)]
        );
    }

    #[test]
    fn test_read_order_high_then_low() {
        let mut bus = FakeBus::default();
        let mut sensor = Mpu6050::new(&mut bus, DEFAULT_ADDRESS, SensorConfig::default()).unwrap();
        sensor.read_raw().unwrap();
        drop(sensor);

        let regs: Vec<u8> = bus.reads.iter().map(|&(_, r)| r).collect();
        assert_eq!(regs, vec![0x3B, 0x3C, 0x3D, 0x3E, 0x3F, 0x40]);
    }

    #[test]
    fn test_read_acceleration_converts() {
        let mut bus = FakeBus::default();
        load_sample(&mut bus, 0x0000, 0xF000, 0x4000);
        let mut sensor = Mpu6050::new(&mut bus, DEFAULT_ADDRESS, SensorConfig::default()).unwrap();

        let raw = sensor.read_raw().unwrap();
        assert_eq!(raw, RawSample { x: 0, y: -4096, z: 16384 });

        let accel = sensor.read_acceleration().unwrap();
        assert_eq!(accel, AccelVector::new(0.0, -1.0, 4.0));
    }

    #[test]
    fn test_read_failure_propagates() {
        let mut bus = FakeBus {
            fail_reads_at: Some(reg::ACCEL_YOUT_L),
            ..Default::default()
        };
        let mut sensor = Mpu6050::new(&mut bus, DEFAULT_ADDRESS, SensorConfig::default()).unwrap();

        let err = sensor.read_acceleration().unwrap_err();
        assert!(matches!(
            err,
            SensorError::Transport(TransportError::NoAcknowledge { address: 0x68 })
        ));
    }
}
