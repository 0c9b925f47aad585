//! Wheel Speed Sensor Geometry
//!
//! Calibration constants for the tooth-wheel speed sensors. These are
//! configuration values fixed by the installed hardware, not runtime-learned
//! quantities.

/// Sensor pulses per wheel rotation.
///
/// The tone ring has 16 teeth, so 16 Hz of pulses equals one rotation per
/// second.
///
/// Source: tone ring drawing
pub const WHEEL_PULSES_PER_REV: f32 = 16.0;

/// Wheel outer diameter (inches).
///
/// Source: tire specification
pub const WHEEL_DIAMETER_IN: f32 = 18.0;

/// Inches per statute mile.
pub const INCHES_PER_MILE: f32 = 63_360.0;
