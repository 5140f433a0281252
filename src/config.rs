//! Configuration for the air mouse
//!
//! Supports TOML serialization. Every field has a default, and a missing
//! file means "all defaults", which reproduces the stock behavior:
//! `/dev/i2c-1` at 0x68, ±8g, 100 calibration samples, dead zone 0.05g,
//! 25 pixels per g, polled every 10ms.

use airmouse_sensor::{calibration, Calibrator, SensorConfig, DEFAULT_ADDRESS};
use airmouse_transport::DEFAULT_BUS_PATH;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::mapper::{PointerMapper, DEFAULT_DEAD_ZONE, DEFAULT_SENSITIVITY};
use crate::pointer::DEFAULT_DEVICE_NAME;
use crate::runner::{BusErrorPolicy, PollSettings};

/// Where to find the sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusConfig {
    /// I2C bus device node
    #[serde(default = "default_bus_device")]
    pub device: String,
    /// 7-bit device address (0x68, or 0x69 with AD0 high)
    #[serde(default = "default_address")]
    pub address: u8,
}

fn default_bus_device() -> String {
    DEFAULT_BUS_PATH.to_string()
}
fn default_address() -> u8 {
    DEFAULT_ADDRESS
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            device: default_bus_device(),
            address: default_address(),
        }
    }
}

/// Startup calibration timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Time to put the sensor down before sampling starts
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// Number of readings averaged into the offset
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// Pause between readings
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_settle_ms() -> u64 {
    calibration::DEFAULT_SETTLE.as_millis() as u64
}
fn default_samples() -> usize {
    calibration::DEFAULT_SAMPLES
}
fn default_interval_ms() -> u64 {
    calibration::DEFAULT_INTERVAL.as_millis() as u64
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            samples: default_samples(),
            interval_ms: default_interval_ms(),
        }
    }
}

/// Virtual device and motion response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerConfig {
    /// Name for the virtual mouse device
    #[serde(default = "default_device_name")]
    pub device_name: String,
    /// Dead zone in g
    #[serde(default = "default_dead_zone")]
    pub dead_zone: f64,
    /// Pixels per g
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
    /// Sleep between polls (fixed, not adjusted for processing time)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_device_name() -> String {
    DEFAULT_DEVICE_NAME.to_string()
}
fn default_dead_zone() -> f64 {
    DEFAULT_DEAD_ZONE
}
fn default_sensitivity() -> f64 {
    DEFAULT_SENSITIVITY
}
fn default_poll_interval_ms() -> u64 {
    10
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            device_name: default_device_name(),
            dead_zone: default_dead_zone(),
            sensitivity: default_sensitivity(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Run loop behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Log every raw reading (expensive at 100 Hz)
    #[serde(default)]
    pub log_samples: bool,
    /// What to do when a bus read fails while polling
    #[serde(default)]
    pub on_bus_error: BusErrorPolicy,
    /// Consecutive failed polls tolerated under the `retry` policy
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_max_retries() -> u32 {
    5
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_samples: false,
            on_bus_error: BusErrorPolicy::default(),
            max_retries: default_max_retries(),
        }
    }
}

/// Complete air mouse configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MouseConfig {
    #[serde(default)]
    pub bus: BusConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
    #[serde(default)]
    pub pointer: PointerConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

impl MouseConfig {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("airmouse")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let config: MouseConfig =
                toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Render as TOML (for `--print-config`)
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.calibration.samples == 0 {
            bail!("calibration.samples must be at least 1");
        }
        if !self.pointer.dead_zone.is_finite() || self.pointer.dead_zone < 0.0 {
            bail!(
                "pointer.dead_zone must be a non-negative number, got {}",
                self.pointer.dead_zone
            );
        }
        if !self.pointer.sensitivity.is_finite() {
            bail!(
                "pointer.sensitivity must be finite, got {}",
                self.pointer.sensitivity
            );
        }
        if self.pointer.poll_interval_ms == 0 {
            bail!("pointer.poll_interval_ms must be at least 1");
        }
        if self.bus.address > 0x7F {
            bail!("bus.address 0x{:02X} is not a 7-bit address", self.bus.address);
        }
        Ok(())
    }

    pub fn calibrator(&self) -> Calibrator {
        Calibrator::new()
            .with_settle(Duration::from_millis(self.calibration.settle_ms))
            .with_samples(self.calibration.samples)
            .with_interval(Duration::from_millis(self.calibration.interval_ms))
    }

    pub fn mapper(&self) -> PointerMapper {
        PointerMapper::new(self.pointer.dead_zone, self.pointer.sensitivity)
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            poll_interval: Duration::from_millis(self.pointer.poll_interval_ms),
            log_samples: self.runtime.log_samples,
            on_bus_error: self.runtime.on_bus_error,
            max_retries: self.runtime.max_retries,
        }
    }
}
