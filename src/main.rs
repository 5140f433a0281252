//! MPU-6050 Air Mouse
//!
//! Main entry point: load config, bring up the sensor and the virtual
//! mouse, calibrate, then poll until Ctrl+C.

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use airmouse::config::MouseConfig;
use airmouse::error::AppError;
use airmouse::pointer::VirtualMouse;
use airmouse::runner::{self, Session};
use airmouse_sensor::Mpu6050;

mod cli;
use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            if let Some(hint) = e.hint() {
                error!("{}", hint);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    // Load config
    let config_path = cli.config.clone().unwrap_or_else(MouseConfig::default_path);
    info!("Loading config from {:?}", config_path);
    let mut config = MouseConfig::load(&config_path).map_err(AppError::config)?;
    cli.apply(&mut config);
    config.validate().map_err(AppError::config)?;

    if cli.print_config {
        print!("{}", config.to_toml().map_err(AppError::config)?);
        return Ok(());
    }

    // Set up Ctrl-C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    if let Err(e) = ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to install Ctrl-C handler: {}", e);
    }

    // Bus and sensor
    let bus = airmouse_transport::open_bus(&config.bus.device)?;
    let sensor = Mpu6050::new(bus, config.bus.address, config.sensor)?;
    info!(
        "Sensor ready on {} at 0x{:02X}",
        config.bus.device,
        sensor.address()
    );

    // Virtual mouse
    let mut mouse = VirtualMouse::new(&config.pointer.device_name)?;
    if let Some(path) = mouse.device_path() {
        info!("Device path: {}", path.display());
    }

    let session = Session::new(sensor, mouse, config.mapper());
    let summary = runner::run(
        session,
        &config.calibrator(),
        &config.poll_settings(),
        &running,
    )?;

    info!(
        "{} polls, {} with movement, {} retried reads",
        summary.polls, summary.emitted, summary.retries
    );
    Ok(())
}
