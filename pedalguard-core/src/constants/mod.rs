//! Constants for the sensor-interpretation layer
//!
//! Centralized, documented numeric values used throughout the crate. All of
//! these are configuration-time constants: datasheet figures, rule-derived
//! tolerances, and unit conversion factors. None are learned at runtime —
//! runtime-learned values (calibration bounds) live in
//! [`SensorChannel`](crate::channel::SensorChannel).
//!
//! Guidelines:
//! 1. Use these instead of magic numbers
//! 2. Include units in the name
//! 3. Reference the datasheet or rule the value comes from

/// Pedal transducer specifications and plausibility thresholds.
pub mod sensors;

/// Time-related constants and default windows.
pub mod time;

/// Wheel speed sensor geometry and unit factors.
pub mod wheel;

// Re-export commonly used constants for convenience
pub use sensors::{
    DISCREPANCY_TOLERANCE, FAIL_SAFE_THROTTLE, MAX_CHANNEL_GROUP,
    MIN_CALIB_SPAN_V, THROTTLE_SPEC_MAX_V, THROTTLE_SPEC_MIN_V,
};

pub use time::{DEFAULT_CALIBRATION_DURATION_MS, MS_PER_SECOND, SECONDS_PER_MINUTE};

pub use wheel::{INCHES_PER_MILE, WHEEL_DIAMETER_IN, WHEEL_PULSES_PER_REV};
