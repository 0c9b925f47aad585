//! Pedal Transducer Specifications and Plausibility Thresholds
//!
//! Values here come from the position transducer datasheet and from the
//! drive-by-wire plausibility rules the throttle subsystem must satisfy.

// ===== THROTTLE POSITION TRANSDUCER =====

/// Minimum valid output voltage of the throttle position transducer (V).
///
/// Ratiometric 0.5–4.5 V position sensors sit at 0.5 V at one mechanical
/// stop; anything below indicates a short to ground or a broken supply.
///
/// Source: transducer datasheet (0.5–4.5 V ratiometric output)
pub const THROTTLE_SPEC_MIN_V: f32 = 0.5;

/// Maximum valid output voltage of the throttle position transducer (V).
///
/// Readings above this indicate a short to the supply rail.
///
/// Source: transducer datasheet (0.5–4.5 V ratiometric output)
pub const THROTTLE_SPEC_MAX_V: f32 = 4.5;

// ===== PLAUSIBILITY POLICY =====

/// Maximum tolerated deviation between redundant channels, as a fraction of
/// full pedal travel.
///
/// A deviation of more than 10% of pedal travel between the two sensors is
/// an implausibility and must force zero drive command.
///
/// Source: FSAE EV rules for accelerator pedal position sensors
pub const DISCREPANCY_TOLERANCE: f32 = 0.10;

/// Output forced whenever any fault is raised during evaluation.
///
/// Zero throttle means "no trusted throttle", not "brake"; the drive system
/// must treat it as an absent torque request.
pub const FAIL_SAFE_THROTTLE: f32 = 0.0;

// ===== CALIBRATION SANITY =====

/// Minimum usable calibration span (V).
///
/// Physical pedal travel covers roughly the middle half of the transducer's
/// electrical range, so a committed span far below a volt means the pedal
/// was not actually swept during the run. Also guards normalization against
/// division by a near-zero span. 5% of the 4.0 V spec span.
pub const MIN_CALIB_SPAN_V: f32 = 0.2;

/// Fixed capacity for redundant channel groups and calibration targets.
///
/// Throttle uses a pair; four leaves headroom for a future redundant
/// brake-position group without reallocating.
pub const MAX_CHANNEL_GROUP: usize = 4;
