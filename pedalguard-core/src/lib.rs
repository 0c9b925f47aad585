//! Dual-channel pedal plausibility and calibration engine
//!
//! Converts raw transducer readings into validated physical quantities for
//! a drive-by-wire vehicle control unit. Two independent pedal position
//! sensors are calibrated against real pedal travel, cross-checked every
//! control cycle, and forced to a zero-torque fail-safe output the moment
//! either channel is out of range, uncalibrated, or disagrees with its
//! counterpart.
//!
//! Key constraints:
//! - No heap allocation in the control path
//! - Every evaluation returns a value; faults are data, never panics
//! - Calibration runs incrementally across cycles, never blocking one
//!
//! ```
//! use pedalguard_core::{ThrottleMonitor, time::FixedTime};
//!
//! let mut monitor = ThrottleMonitor::new(FixedTime::new(0));
//! monitor.ingest(1.1, 1.2);
//!
//! // No calibration has run yet, so the output is forced to fail-safe.
//! let result = monitor.evaluate_throttle();
//! assert_eq!(result.value, 0.0);
//! assert!(!result.is_trusted());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

// Optional logging shims; calls compile away when the `log` feature is off.
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

pub mod calibration;
pub mod channel;
pub mod constants;
pub mod errors;
pub mod monitor;
pub mod plausibility;
pub mod time;
pub mod units;

// Public API
pub use calibration::{CalibrationState, Calibrator, CommitReport};
pub use channel::{ChannelSnapshot, SensorChannel};
pub use errors::{CalibrationError, Fault, FaultKind, FaultSet};
pub use monitor::ThrottleMonitor;
pub use plausibility::{PlausibilityEvaluator, PlausibilityResult};
pub use time::{TimeSource, Timestamp};
pub use units::WheelSpeedConverter;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
