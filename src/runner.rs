//! Main run loop
//!
//! `Init -> Calibrating -> Polling -> Terminating`, with no way back to
//! calibration. The loop runs until the shared `running` flag is cleared
//! (Ctrl-C) or a bus failure ends it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use airmouse_sensor::{AccelerationSource, CalibrationOffset, Calibrator, SensorError};
use evdev::uinput::VirtualDevice;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::mapper::PointerMapper;
use crate::pointer::{InputSink, VirtualMouse};

/// First retry delay under [`BusErrorPolicy::Retry`]
pub const INITIAL_BACKOFF: Duration = Duration::from_millis(10);
/// Upper bound for the retry delay
pub const MAX_BACKOFF: Duration = Duration::from_secs(1);

/// What a failed bus read during polling means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusErrorPolicy {
    /// Stop polling, release the devices and exit non-zero
    #[default]
    Exit,
    /// Retry transient failures with exponential backoff, then exit
    Retry,
}

/// Delay before retry number `attempt` (1-based): 10ms, 20ms, 40ms, ... capped at 1s
pub fn retry_backoff(attempt: u32) -> Duration {
    let shift = attempt.saturating_sub(1).min(16);
    INITIAL_BACKOFF.saturating_mul(1 << shift).min(MAX_BACKOFF)
}

/// Polling parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PollSettings {
    pub poll_interval: Duration,
    pub log_samples: bool,
    pub on_bus_error: BusErrorPolicy,
    pub max_retries: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
            log_samples: false,
            on_bus_error: BusErrorPolicy::Exit,
            max_retries: 5,
        }
    }
}

impl PollSettings {
    fn should_retry(&self, err: &SensorError, failures: u32) -> bool {
        self.on_bus_error == BusErrorPolicy::Retry
            && failures < self.max_retries
            && err.transport().is_some_and(|e| e.is_transient())
    }
}

/// Run loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    Calibrating,
    Polling,
    Terminating,
}

/// What a finished run did
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunSummary {
    /// Offset measured at startup (None if interrupted while calibrating)
    pub offset: Option<CalibrationOffset>,
    /// Successful polls
    pub polls: u64,
    /// Polls that moved the pointer
    pub emitted: u64,
    /// Failed reads that were retried
    pub retries: u64,
}

/// Everything a run owns: the sensor (and its bus) and the virtual mouse
///
/// Dropping the session releases both handles, so every exit path,
/// including errors during setup or calibration, cleans up.
pub struct Session<S, O = VirtualDevice> {
    sensor: S,
    mouse: VirtualMouse<O>,
    mapper: PointerMapper,
    state: RunState,
}

impl<S: AccelerationSource, O: InputSink> Session<S, O> {
    pub fn new(sensor: S, mouse: VirtualMouse<O>, mapper: PointerMapper) -> Self {
        Self {
            sensor,
            mouse,
            mapper,
            state: RunState::Init,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn mouse(&self) -> &VirtualMouse<O> {
        &self.mouse
    }

    /// Measure the resting offset
    pub fn calibrate(
        &mut self,
        calibrator: &Calibrator,
        running: &AtomicBool,
    ) -> Result<CalibrationOffset, SensorError> {
        self.state = RunState::Calibrating;
        calibrator.calibrate(&mut self.sensor, running)
    }

    /// One iteration: read, map, emit. Returns whether anything was emitted.
    pub fn step(&mut self, offset: CalibrationOffset, log_samples: bool) -> Result<bool, AppError> {
        let accel = self.sensor.read_acceleration()?;
        if log_samples {
            info!(
                "Raw Accel: X={:.2}, Y={:.2}, Z={:.2}",
                accel.x, accel.y, accel.z
            );
        }

        let delta = self.mapper.map(accel, offset);
        Ok(self.mouse.move_by(delta)?)
    }

    /// Poll at a fixed interval until `running` is cleared
    pub fn poll(
        &mut self,
        offset: CalibrationOffset,
        settings: &PollSettings,
        running: &AtomicBool,
    ) -> Result<RunSummary, AppError> {
        self.state = RunState::Polling;
        info!("Entering main loop. Press Ctrl+C to exit.");

        let mut summary = RunSummary {
            offset: Some(offset),
            ..Default::default()
        };
        let mut failures = 0u32;

        while running.load(Ordering::SeqCst) {
            match self.step(offset, settings.log_samples) {
                Ok(emitted) => {
                    failures = 0;
                    summary.polls += 1;
                    if emitted {
                        summary.emitted += 1;
                    }
                }
                Err(AppError::Sensor(e)) if settings.should_retry(&e, failures) => {
                    failures += 1;
                    summary.retries += 1;
                    let backoff = retry_backoff(failures);
                    warn!(
                        "Sensor read failed ({}), retry {}/{} in {:?}",
                        e, failures, settings.max_retries, backoff
                    );
                    thread::sleep(backoff);
                    continue;
                }
                Err(e) => {
                    self.state = RunState::Terminating;
                    return Err(e);
                }
            }

            thread::sleep(settings.poll_interval);
        }

        self.state = RunState::Terminating;
        debug!(
            "Polling stopped after {} polls ({} with movement)",
            summary.polls, summary.emitted
        );
        Ok(summary)
    }

    /// Destroy the virtual mouse and close the bus
    pub fn release(self) {
        let Session { sensor, mouse, .. } = self;
        mouse.release();
        drop(sensor);
        debug!("Sensor released");
    }
}

/// Calibrate, poll until interrupted, then release everything
///
/// An interrupt during calibration is a clean exit, not an error.
pub fn run<S: AccelerationSource, O: InputSink>(
    mut session: Session<S, O>,
    calibrator: &Calibrator,
    settings: &PollSettings,
    running: &AtomicBool,
) -> Result<RunSummary, AppError> {
    let result = match session.calibrate(calibrator, running) {
        Ok(offset) => session.poll(offset, settings, running),
        Err(SensorError::Cancelled) => {
            info!("Interrupted during calibration");
            Ok(RunSummary::default())
        }
        Err(e) => Err(e.into()),
    };

    session.release();
    if result.is_ok() {
        info!("Exiting...");
    }
    result
}
