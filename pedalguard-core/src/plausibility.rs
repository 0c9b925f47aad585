//! Redundant-channel plausibility evaluation
//!
//! A drive-by-wire throttle uses two independent position sensors on the
//! same pedal. Every control cycle this module validates both channels and
//! either yields a trusted pedal-travel fraction or forces the fail-safe
//! value with a record of why.
//!
//! The evaluation runs four checks in order, collecting faults instead of
//! returning early so a single cycle reports everything that is wrong:
//!
//! 1. **Range check** — each raw reading against its *spec* bounds; a
//!    signal outside the transducer's operating range is a sensor failure.
//! 2. **Calibration gate** — every channel must have committed calibration.
//! 3. **Normalize** — each reading to a bounded 0–1 pedal fraction against
//!    its *calibration* bounds.
//! 4. **Cross-check** — the normalized fractions must agree within the
//!    configured tolerance.
//!
//! Aggregation is deliberately a separate, auditable policy
//! ([`fail_safe_policy`]): *any* fault forces the fail-safe value. A partly
//! valid redundant group must never command partial torque, because the one
//! bad sensor may be the one that is lying.

use crate::channel::SensorChannel;
use crate::constants::sensors::{DISCREPANCY_TOLERANCE, FAIL_SAFE_THROTTLE, MAX_CHANNEL_GROUP};
use crate::errors::{Fault, FaultSet};

/// Result of one evaluation cycle.
///
/// Cycles are independent: no state is carried between results except the
/// channels' own calibration data, so a fault clears itself on the next
/// cycle once its triggering condition is gone.
#[derive(Debug, Clone, PartialEq)]
pub struct PlausibilityResult {
    /// Validated 0–1 pedal fraction, or the fail-safe value
    pub value: f32,
    /// Faults raised this cycle; empty when `value` is trusted
    pub faults: FaultSet,
}

impl PlausibilityResult {
    /// True if the value came from agreeing, validated channels.
    pub fn is_trusted(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Per-cycle evaluator for a redundant channel group.
///
/// Stateless between cycles; configuration is the discrepancy tolerance and
/// the fail-safe output value.
#[derive(Debug, Clone)]
pub struct PlausibilityEvaluator {
    /// Maximum tolerated pairwise difference between normalized fractions
    tolerance: f32,

    /// Output forced when any fault is raised
    fail_safe: f32,
}

impl Default for PlausibilityEvaluator {
    fn default() -> Self {
        Self {
            tolerance: DISCREPANCY_TOLERANCE,
            fail_safe: FAIL_SAFE_THROTTLE,
        }
    }
}

impl PlausibilityEvaluator {
    /// Creates an evaluator with custom policy values.
    pub fn new(tolerance: f32, fail_safe: f32) -> Self {
        Self {
            tolerance: libm::fabsf(tolerance),
            fail_safe,
        }
    }

    /// Configured discrepancy tolerance.
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Configured fail-safe output value.
    pub fn fail_safe(&self) -> f32 {
        self.fail_safe
    }

    /// Evaluates one control cycle over a redundant channel group.
    ///
    /// Always returns a result; faults are collected, never thrown. Groups
    /// larger than a pair are cross-checked by maximum pairwise difference.
    pub fn evaluate(&self, channels: &[SensorChannel]) -> PlausibilityResult {
        let mut faults = FaultSet::new();

        // 1. Range check against spec bounds, not calibration bounds: a
        // reading outside the datasheet range is a failed sensor no matter
        // what was calibrated.
        for ch in channels {
            let value = ch.last_value();
            if !ch.in_spec_range(value) {
                faults.record(Fault::OutOfRange {
                    channel: ch.label(),
                    value,
                    spec_min: ch.spec_min(),
                    spec_max: ch.spec_max(),
                });
            }
        }

        // 2. Calibration gate
        for ch in channels {
            if !ch.is_calibrated() {
                faults.record(Fault::Uncalibrated {
                    channel: ch.label(),
                });
            }
        }

        // 3. Normalize every channel regardless of earlier faults, so one
        // cycle surfaces all conditions at once (a degenerate span is worth
        // reporting even on an out-of-range cycle).
        let mut fractions: heapless::Vec<f32, MAX_CHANNEL_GROUP> = heapless::Vec::new();
        for ch in channels {
            match ch.normalize(ch.last_value(), true) {
                Ok(fraction) => {
                    let _ = fractions.push(fraction);
                }
                Err(fault) => {
                    faults.record(fault);
                }
            }
        }

        // 4. Cross-check, only meaningful when every channel normalized
        if fractions.len() == channels.len() && fractions.len() >= 2 {
            let delta = max_pairwise_delta(&fractions);
            if delta > self.tolerance {
                faults.record(Fault::Discrepancy {
                    delta,
                    tolerance: self.tolerance,
                });
            }
        }

        // 5. Aggregate under the explicit fail-safe policy
        let mean = if fractions.is_empty() {
            self.fail_safe
        } else {
            fractions.iter().sum::<f32>() / fractions.len() as f32
        };
        let value = fail_safe_policy(&faults, mean, self.fail_safe);

        if !faults.is_empty() {
            log_warn!(
                "throttle implausible: {} fault(s), output forced to {}",
                faults.len(),
                value
            );
            #[cfg(feature = "log")]
            for fault in faults.iter() {
                log::warn!("  {}", fault);
            }
        }

        PlausibilityResult { value, faults }
    }
}

/// The aggregation rule, kept separate so it can be audited on its own:
/// any fault forces the fail-safe value; otherwise the candidate passes
/// through untouched.
pub fn fail_safe_policy(faults: &FaultSet, candidate: f32, fail_safe: f32) -> f32 {
    if faults.is_empty() {
        candidate
    } else {
        fail_safe
    }
}

/// Largest absolute difference between any two fractions in the group.
fn max_pairwise_delta(fractions: &[f32]) -> f32 {
    let mut worst = 0.0f32;
    for (i, a) in fractions.iter().enumerate() {
        for b in &fractions[i + 1..] {
            let delta = libm::fabsf(a - b);
            if delta > worst {
                worst = delta;
            }
        }
    }
    worst
}
