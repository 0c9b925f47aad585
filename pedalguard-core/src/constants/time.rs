//! Time Constants
//!
//! Conversion factors and default windows for the timed calibration
//! procedure.

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Seconds per minute, as used in rate conversions.
pub const SECONDS_PER_MINUTE: f32 = 60.0;

/// Minutes per hour, as used in rate conversions.
pub const MINUTES_PER_HOUR: f32 = 60.0;

/// Default calibration recording window (ms).
///
/// Long enough for an operator to sweep the pedal through both mechanical
/// stops a few times; short enough not to monopolize a startup procedure.
pub const DEFAULT_CALIBRATION_DURATION_MS: u32 = 5_000;
