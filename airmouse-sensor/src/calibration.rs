//! Static offset calibration
//!
//! While the sensor rests flat, average a fixed number of readings to get
//! the per-axis resting bias. The offset is computed once per run; there is
//! no outlier rejection or variance check.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::SensorError;
use crate::sensor::AccelerationSource;
use crate::types::CalibrationOffset;

/// Time given to the operator to put the sensor down
pub const DEFAULT_SETTLE: Duration = Duration::from_secs(2);
/// Number of readings averaged
pub const DEFAULT_SAMPLES: usize = 100;
/// Pause between readings
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(10);

/// Longest single sleep before the running flag is checked again
const CANCEL_CHECK_STEP: Duration = Duration::from_millis(10);

/// Averages resting readings into a [`CalibrationOffset`]
#[derive(Debug, Clone)]
pub struct Calibrator {
    settle: Duration,
    samples: usize,
    interval: Duration,
}

impl Default for Calibrator {
    fn default() -> Self {
        Self {
            settle: DEFAULT_SETTLE,
            samples: DEFAULT_SAMPLES,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl Calibrator {
    /// Create a calibrator with the default 2s settle, 100 samples, 10ms apart
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Measure the resting offset of the X and Y axes
    ///
    /// Sleeps `settle`, then takes exactly `samples` readings with `interval`
    /// between them and returns the per-axis mean. Z is read but unused.
    /// Returns [`SensorError::Cancelled`] as soon as `running` is cleared.
    pub fn calibrate<S: AccelerationSource>(
        &self,
        source: &mut S,
        running: &AtomicBool,
    ) -> Result<CalibrationOffset, SensorError> {
        if self.samples == 0 {
            return Err(SensorError::InvalidParameter(
                "calibration needs at least one sample".into(),
            ));
        }

        info!("Calibrating... Keep sensor flat and still!");
        sleep_while_running(self.settle, running)?;

        let mut sum_x = 0.0;
        let mut sum_y = 0.0;

        for _ in 0..self.samples {
            if !running.load(Ordering::SeqCst) {
                return Err(SensorError::Cancelled);
            }

            let accel = source.read_acceleration()?;
            sum_x += accel.x;
            sum_y += accel.y;

            sleep_while_running(self.interval, running)?;
        }

        let offset = CalibrationOffset {
            x: sum_x / self.samples as f64,
            y: sum_y / self.samples as f64,
        };

        debug!("Calibration used {} samples", self.samples);
        info!(
            "Calibration complete. Offsets: X={:.2}g, Y={:.2}g",
            offset.x, offset.y
        );

        Ok(offset)
    }
}

/// Sleep for `duration` in short steps, bailing out once `running` clears
fn sleep_while_running(duration: Duration, running: &AtomicBool) -> Result<(), SensorError> {
    let mut remaining = duration;
    while !remaining.is_zero() {
        if !running.load(Ordering::SeqCst) {
            return Err(SensorError::Cancelled);
        }
        let step = remaining.min(CANCEL_CHECK_STEP);
        thread::sleep(step);
        remaining -= step;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccelVector;
    use airmouse_transport::TransportError;

    /// Returns the same reading forever and counts reads
    struct Constant {
        value: AccelVector,
        reads: usize,
    }

    impl AccelerationSource for Constant {
        fn read_acceleration(&mut self) -> Result<AccelVector, SensorError> {
            self.reads += 1;
            Ok(self.value)
        }
    }

    fn fast() -> Calibrator {
        Calibrator::new()
            .with_settle(Duration::ZERO)
            .with_interval(Duration::ZERO)
    }

    #[test]
    fn test_defaults() {
        let cal = Calibrator::default();
        assert_eq!(cal.settle, Duration::from_secs(2));
        assert_eq!(cal.samples(), 100);
        assert_eq!(cal.interval, Duration::from_millis(10));
    }

    #[test]
    fn test_constant_input_gives_exact_offset() {
        let mut source = Constant {
            value: AccelVector::new(1.0, -0.25, 1.0),
            reads: 0,
        };
        let running = AtomicBool::new(true);

        let offset = fast().calibrate(&mut source, &running).unwrap();

        assert_eq!(offset.x, 1.0);
        assert_eq!(offset.y, -0.25);
        assert_eq!(source.reads, 100);
    }

    #[test]
    fn test_mean_of_varying_input() {
        struct Ramp(f64);
        impl AccelerationSource for Ramp {
            fn read_acceleration(&mut self) -> Result<AccelVector, SensorError> {
                self.0 += 1.0;
                Ok(AccelVector::new(self.0, 0.0, 0.0))
            }
        }

        // 1..=4 averages to 2.5
        let mut source = Ramp(0.0);
        let running = AtomicBool::new(true);
        let offset = fast()
            .with_samples(4)
            .calibrate(&mut source, &running)
            .unwrap();
        assert_eq!(offset.x, 2.5);
        assert_eq!(offset.y, 0.0);
    }

    #[test]
    fn test_zero_samples_rejected() {
        let mut source = Constant {
            value: AccelVector::default(),
            reads: 0,
        };
        let running = AtomicBool::new(true);
        let err = fast()
            .with_samples(0)
            .calibrate(&mut source, &running)
            .unwrap_err();
        assert!(matches!(err, SensorError::InvalidParameter(_)));
        assert_eq!(source.reads, 0);
    }

    #[test]
    fn test_cancelled_before_sampling() {
        let mut source = Constant {
            value: AccelVector::default(),
            reads: 0,
        };
        let running = AtomicBool::new(false);
        let err = Calibrator::new().calibrate(&mut source, &running).unwrap_err();
        assert!(matches!(err, SensorError::Cancelled));
        assert_eq!(source.reads, 0);
    }

    #[test]
    fn test_read_error_aborts() {
        struct Failing;
        impl AccelerationSource for Failing {
            fn read_acceleration(&mut self) -> Result<AccelVector, SensorError> {
                Err(TransportError::NoAcknowledge { address: 0x68 }.into())
            }
        }

        let running = AtomicBool::new(true);
        let err = fast().calibrate(&mut Failing, &running).unwrap_err();
        assert!(err.transport().is_some());
    }
}
