//! Virtual mouse device using evdev/uinput
//!
//! Creates a relative pointing device that the desktop treats like a
//! regular USB mouse.

use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, EventType, InputEvent, Key, RelativeAxisType,
};
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::mapper::PointerDelta;

/// Default device name (shown in `evtest` and `libinput list-devices`)
pub const DEFAULT_DEVICE_NAME: &str = "MPU6050-Mouse";

/// Buttons declared on the device (reserved, never pressed by the pipeline)
pub const BUTTONS: [Key; 2] = [Key::BTN_LEFT, Key::BTN_RIGHT];

/// Relative axes declared on the device
///
/// REL_WHEEL is never emitted, but without it libinput does not classify
/// the device as a mouse.
pub const AXES: [RelativeAxisType; 3] = [
    RelativeAxisType::REL_X,
    RelativeAxisType::REL_Y,
    RelativeAxisType::REL_WHEEL,
];

/// Errors from virtual mouse operations
#[derive(Debug, Error)]
pub enum PointerError {
    #[error("Failed to create virtual device: {0}")]
    CreateDevice(#[source] std::io::Error),
    #[error("Failed to emit event: {0}")]
    EmitEvent(#[source] std::io::Error),
}

/// Destination for batches of input events
pub trait InputSink {
    /// Write `events` followed by a SYN_REPORT, so the OS applies them together
    fn write_batch(&mut self, events: &[InputEvent]) -> std::io::Result<()>;
}

impl InputSink for VirtualDevice {
    fn write_batch(&mut self, events: &[InputEvent]) -> std::io::Result<()> {
        // VirtualDevice::emit appends the SYN_REPORT itself
        self.emit(events)
    }
}

/// Virtual relative mouse
pub struct VirtualMouse<O = VirtualDevice> {
    sink: O,
    name: String,
}

impl VirtualMouse {
    /// Create the uinput device
    ///
    /// Fails if `/dev/uinput` is missing or not writable by this user.
    pub fn new(name: &str) -> Result<Self, PointerError> {
        let mut keys = AttributeSet::<Key>::new();
        for key in BUTTONS {
            keys.insert(key);
        }

        let mut axes = AttributeSet::<RelativeAxisType>::new();
        for axis in AXES {
            axes.insert(axis);
        }

        let device = VirtualDeviceBuilder::new()
            .map_err(PointerError::CreateDevice)?
            .name(name)
            .with_keys(&keys)
            .map_err(PointerError::CreateDevice)?
            .with_relative_axes(&axes)
            .map_err(PointerError::CreateDevice)?
            .build()
            .map_err(PointerError::CreateDevice)?;

        info!("Created virtual mouse: {}", name);
        Ok(Self::with_sink(name, device))
    }

    /// Get the device path (e.g., /dev/input/eventX)
    pub fn device_path(&mut self) -> Option<std::path::PathBuf> {
        self.sink
            .enumerate_dev_nodes_blocking()
            .ok()?
            .next()?
            .ok()
    }
}

impl<O: InputSink> VirtualMouse<O> {
    /// Wrap an arbitrary sink (used for tests and dry runs)
    pub fn with_sink(name: &str, sink: O) -> Self {
        Self {
            sink,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Move the pointer by `delta`
    ///
    /// An idle delta emits nothing and returns `false`. Otherwise REL_X and
    /// REL_Y are written (both, even if one is zero) followed by SYN_REPORT.
    pub fn move_by(&mut self, delta: PointerDelta) -> Result<bool, PointerError> {
        if delta.is_idle() {
            return Ok(false);
        }

        trace!("Sending mouse movement: X={}, Y={}", delta.x, delta.y);
        let events = [
            InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_X.0, delta.x),
            InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_Y.0, delta.y),
        ];
        self.sink
            .write_batch(&events)
            .map_err(PointerError::EmitEvent)?;

        Ok(true)
    }

    /// Destroy the device so the OS removes it
    pub fn release(self) {
        debug!("Releasing virtual mouse: {}", self.name);
        drop(self.sink);
    }

    pub fn sink(&self) -> &O {
        &self.sink
    }
}
