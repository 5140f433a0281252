//! MPU-6050 register map (the subset this crate touches)

/// Default I2C address (AD0 pulled low)
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// Register addresses
pub mod reg {
    pub const GYRO_CONFIG: u8 = 0x1B;
    pub const ACCEL_CONFIG: u8 = 0x1C;

    // Accelerometer output, big-endian high/low pairs
    pub const ACCEL_XOUT_H: u8 = 0x3B;
    pub const ACCEL_XOUT_L: u8 = 0x3C;
    pub const ACCEL_YOUT_H: u8 = 0x3D;
    pub const ACCEL_YOUT_L: u8 = 0x3E;
    pub const ACCEL_ZOUT_H: u8 = 0x3F;
    pub const ACCEL_ZOUT_L: u8 = 0x40;

    /// Power management 1: sleep bit, clock select
    pub const PWR_MGMT_1: u8 = 0x6B;
}

/// PWR_MGMT_1 values
pub mod power {
    /// Clear SLEEP, clock from the X gyro PLL
    pub const WAKE_PLL_X: u8 = 0x01;
}
