//! MPU-6050 Air Mouse
//!
//! Reads the accelerometer over I2C, removes the resting bias measured at
//! startup, and moves a virtual uinput mouse by the remaining tilt.

pub mod config;
pub mod error;
pub mod mapper;
pub mod pointer;
pub mod runner;

pub use config::MouseConfig;
pub use error::AppError;
pub use mapper::{map_to_pointer, PointerDelta, PointerMapper};
pub use pointer::{InputSink, PointerError, VirtualMouse};
pub use runner::{run, BusErrorPolicy, PollSettings, RunState, RunSummary, Session};
