// CLI definitions using clap

use clap::Parser;
use std::path::PathBuf;

use airmouse::MouseConfig;

#[derive(Parser)]
#[command(name = "airmouse")]
#[command(author, version, about = "Use an MPU-6050 accelerometer as a mouse")]
pub struct Cli {
    /// Config file path (default: ~/.config/airmouse/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// I2C bus device (overrides config)
    #[arg(short, long, value_name = "PATH")]
    pub device: Option<String>,

    /// Sensor I2C address, decimal or 0x-prefixed hex (overrides config)
    #[arg(short, long, value_parser = parse_address)]
    pub address: Option<u8>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log every raw accelerometer reading
    #[arg(long)]
    pub log_samples: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config
    pub fn apply(&self, config: &mut MouseConfig) {
        if let Some(device) = &self.device {
            config.bus.device = device.clone();
        }
        if let Some(address) = self.address {
            config.bus.address = address;
        }
        if self.log_samples {
            config.runtime.log_samples = true;
        }
    }
}

/// Parse an address given as `104` or `0x68`
fn parse_address(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid address '{s}': {e}"))
}
