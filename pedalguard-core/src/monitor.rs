//! Control-cycle facade for the throttle subsystem
//!
//! [`ThrottleMonitor`] owns the canonical pair of throttle channels, the
//! calibration controller, the evaluator, and the clock, and exposes the
//! operations the external collaborators call:
//!
//! - the sampling collaborator deposits raw voltages with
//!   [`ingest`](ThrottleMonitor::ingest);
//! - the scheduler drives [`poll_calibration`](ThrottleMonitor::poll_calibration)
//!   and [`evaluate_throttle`](ThrottleMonitor::evaluate_throttle) once per
//!   control cycle, in that order, after ingestion;
//! - an operator trigger calls
//!   [`start_calibration`](ThrottleMonitor::start_calibration) /
//!   [`abort_calibration`](ThrottleMonitor::abort_calibration);
//! - diagnostics read [`snapshots`](ThrottleMonitor::snapshots).
//!
//! The channels live here for their whole process lifetime; nothing else
//! owns or stores references to them.

use crate::calibration::{Calibrator, CommitReport};
use crate::channel::{ChannelSnapshot, SensorChannel};
use crate::constants::sensors::{THROTTLE_SPEC_MAX_V, THROTTLE_SPEC_MIN_V};
use crate::errors::CalibrationError;
use crate::plausibility::{PlausibilityEvaluator, PlausibilityResult};
use crate::time::TimeSource;

/// Owner of the redundant throttle channel pair and its control logic.
#[derive(Debug)]
pub struct ThrottleMonitor<C: TimeSource> {
    channels: [SensorChannel; 2],
    calibrator: Calibrator,
    evaluator: PlausibilityEvaluator,
    clock: C,
}

impl<C: TimeSource> ThrottleMonitor<C> {
    /// Creates a monitor with the standard 0.5–4.5 V throttle pair and
    /// default plausibility policy.
    pub fn new(clock: C) -> Self {
        Self::with_channels(
            clock,
            SensorChannel::new("throttle-a", THROTTLE_SPEC_MIN_V, THROTTLE_SPEC_MAX_V),
            SensorChannel::new("throttle-b", THROTTLE_SPEC_MIN_V, THROTTLE_SPEC_MAX_V),
        )
    }

    /// Creates a monitor over a custom channel pair.
    pub fn with_channels(clock: C, a: SensorChannel, b: SensorChannel) -> Self {
        Self {
            channels: [a, b],
            calibrator: Calibrator::default(),
            evaluator: PlausibilityEvaluator::default(),
            clock,
        }
    }

    /// Replaces the evaluator policy (tolerance, fail-safe value).
    pub fn with_evaluator(mut self, evaluator: PlausibilityEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Deposits fresh raw samples for both channels.
    ///
    /// Must run before [`evaluate_throttle`](Self::evaluate_throttle)
    /// within a control cycle.
    pub fn ingest(&mut self, raw_a: f32, raw_b: f32) {
        self.channels[0].push_sample(raw_a);
        self.channels[1].push_sample(raw_b);
    }

    /// Starts a timed calibration run over both channels.
    ///
    /// While the run is active the evaluator output is fail-safe, since
    /// mid-calibration bounds are not a valid calibration range.
    pub fn start_calibration(&mut self, duration_ms: u32) -> Result<(), CalibrationError> {
        let now = self.clock.now();
        self.calibrator.begin(&mut self.channels, now, duration_ms)
    }

    /// Aborts an active calibration run, restoring prior calibration.
    pub fn abort_calibration(&mut self) {
        self.calibrator.abort(&mut self.channels);
    }

    /// Advances an active calibration run by one cycle.
    ///
    /// Returns the commit report on the cycle in which the recording window
    /// elapses, `None` otherwise.
    pub fn poll_calibration(&mut self) -> Option<CommitReport> {
        let now = self.clock.now();
        self.calibrator.poll(&mut self.channels, now)
    }

    /// True while a calibration run is recording or committing.
    pub fn is_calibrating(&self) -> bool {
        self.calibrator.is_active()
    }

    /// Produces this cycle's validated throttle fraction.
    pub fn evaluate_throttle(&self) -> PlausibilityResult {
        self.evaluator.evaluate(&self.channels)
    }

    /// Diagnostics view of both channels.
    pub fn snapshots(&self) -> [ChannelSnapshot; 2] {
        [self.channels[0].snapshot(), self.channels[1].snapshot()]
    }

    /// Read access to the owned channels.
    pub fn channels(&self) -> &[SensorChannel; 2] {
        &self.channels
    }

    /// Mutable access for the non-volatile storage collaborator, which
    /// restores persisted calibration bounds at startup.
    pub fn channels_mut(&mut self) -> &mut [SensorChannel; 2] {
        &mut self.channels
    }

    /// Mutable access to the clock; primarily for tests with a fixed
    /// time source.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FaultKind;
    use crate::time::FixedTime;

    fn restored_monitor() -> ThrottleMonitor<FixedTime> {
        let mut monitor = ThrottleMonitor::new(FixedTime::new(0));
        for ch in monitor.channels_mut() {
            ch.restore_calibration(0.5, 4.5).unwrap();
        }
        monitor
    }

    #[test]
    fn uncalibrated_monitor_fails_safe() {
        let mut monitor = ThrottleMonitor::new(FixedTime::new(0));
        monitor.ingest(2.5, 2.5);

        let result = monitor.evaluate_throttle();
        assert_eq!(result.value, 0.0);
        assert!(result.faults.has(FaultKind::Uncalibrated));
    }

    #[test]
    fn calibrate_then_trust() {
        let mut monitor = ThrottleMonitor::new(FixedTime::new(0));
        monitor.start_calibration(100).unwrap();
        assert!(monitor.is_calibrating());

        // Sweep the pedal across the full range over the window
        let mut report = None;
        for i in 0..=20u64 {
            let v = 0.5 + 4.0 * (i as f32 / 20.0);
            monitor.ingest(v, v);
            monitor.clock_mut().set(i * 5);
            report = monitor.poll_calibration();
            if report.is_some() {
                break;
            }
        }

        let report = report.expect("calibration should commit");
        assert!(report.all_committed());
        assert!(!monitor.is_calibrating());

        monitor.ingest(2.5, 2.5);
        let result = monitor.evaluate_throttle();
        assert!(result.is_trusted());
        assert!((result.value - 0.5).abs() < 1e-6);
    }

    #[test]
    fn output_fails_safe_while_calibrating() {
        let mut monitor = restored_monitor();
        monitor.ingest(2.5, 2.5);
        assert!(monitor.evaluate_throttle().is_trusted());

        monitor.start_calibration(1000).unwrap();
        monitor.ingest(2.5, 2.5);
        monitor.poll_calibration();

        let result = monitor.evaluate_throttle();
        assert_eq!(result.value, 0.0);
        assert!(result.faults.has(FaultKind::Uncalibrated));
    }

    #[test]
    fn abort_restores_trusted_output() {
        let mut monitor = restored_monitor();
        monitor.start_calibration(1000).unwrap();
        monitor.ingest(2.0, 2.0);
        monitor.poll_calibration();

        monitor.abort_calibration();
        monitor.ingest(2.5, 2.5);
        assert!(monitor.evaluate_throttle().is_trusted());
    }

    #[test]
    fn snapshots_expose_calibration_state() {
        let monitor = restored_monitor();
        let [a, b] = monitor.snapshots();
        assert_eq!(a.label, "throttle-a");
        assert_eq!(b.label, "throttle-b");
        assert!(a.calibrated && b.calibrated);
    }
}
