//! Timed calibration state machine
//!
//! Physical pedal travel only spans part of a transducer's electrical
//! range, so the usable range has to be *recorded*: an operator starts a
//! run, sweeps the pedal to both mechanical stops within the configured
//! window, and the observed extremes become the calibrated range.
//!
//! The [`Calibrator`] is an incremental state machine —
//! `Idle -> Running -> Committing -> Idle` — advanced by one
//! [`poll`](Calibrator::poll) call per control cycle. It never blocks the
//! caller; the recording window spans wall-clock time across many cycles.
//!
//! While a run is active the target channels are deliberately uncalibrated
//! (reset at [`begin`](Calibrator::begin)), so the plausibility evaluator
//! forces fail-safe output for the whole window: half-converged bounds are
//! not a valid calibration range.

use crate::channel::SensorChannel;
use crate::constants::sensors::{MAX_CHANNEL_GROUP, MIN_CALIB_SPAN_V};
use crate::errors::{CalibrationError, FaultSet};
use crate::time::Timestamp;

/// Saved pre-run calibration, restored if the run is aborted.
#[derive(Debug, Clone, Copy)]
struct CalibSnapshot {
    calib_min: f32,
    calib_max: f32,
    calibrated: bool,
}

/// State of the calibration controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationState {
    /// No run in progress; channels keep their prior calibration.
    Idle,
    /// Recording min/max from fresh samples until the window elapses.
    Running {
        /// Timestamp at which the run entered `Running`
        started_at: Timestamp,
        /// Configured recording window
        duration_ms: u32,
    },
    /// Sanity-checking and committing the recorded bounds.
    Committing,
}

/// Outcome of a completed calibration run.
#[derive(Debug, Clone, Default)]
pub struct CommitReport {
    /// Channels whose bounds passed the sanity check and committed
    pub committed: usize,
    /// Degenerate-calibration faults for channels that failed it
    pub faults: FaultSet,
}

impl CommitReport {
    /// True if every target channel committed.
    pub fn all_committed(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Bounded-duration calibration controller for a group of channels.
///
/// The controller holds no channel references; the control-cycle driver
/// owns the channels and passes the same group to every call. Per-channel
/// pre-run state is snapshotted at [`begin`](Calibrator::begin) so
/// [`abort`](Calibrator::abort) can restore it.
#[derive(Debug)]
pub struct Calibrator {
    state: CalibrationState,
    min_span: f32,
    snapshots: heapless::Vec<CalibSnapshot, MAX_CHANNEL_GROUP>,
}

impl Default for Calibrator {
    fn default() -> Self {
        Self {
            state: CalibrationState::Idle,
            min_span: MIN_CALIB_SPAN_V,
            snapshots: heapless::Vec::new(),
        }
    }
}

impl Calibrator {
    /// Creates a controller with a custom commit sanity span.
    pub fn with_min_span(min_span: f32) -> Self {
        Self {
            min_span: libm::fabsf(min_span),
            ..Self::default()
        }
    }

    /// Current state.
    pub fn state(&self) -> CalibrationState {
        self.state
    }

    /// True while a run is recording or committing.
    pub fn is_active(&self) -> bool {
        self.state != CalibrationState::Idle
    }

    /// Starts a recording run over `channels` with the given window.
    ///
    /// Only legal from `Idle`; a second request while a run is active is
    /// rejected with [`CalibrationError::AlreadyRunning`] and the in-flight
    /// run is undisturbed. On entry each channel's current calibration is
    /// snapshotted, then its bounds are reset inverted (first sample defines
    /// both) and its committed flag cleared.
    pub fn begin(
        &mut self,
        channels: &mut [SensorChannel],
        now: Timestamp,
        duration_ms: u32,
    ) -> Result<(), CalibrationError> {
        if self.is_active() {
            return Err(CalibrationError::AlreadyRunning);
        }
        if channels.len() > MAX_CHANNEL_GROUP {
            return Err(CalibrationError::GroupTooLarge {
                max: MAX_CHANNEL_GROUP,
            });
        }

        self.snapshots.clear();
        for ch in channels.iter_mut() {
            let _ = self.snapshots.push(CalibSnapshot {
                calib_min: ch.calib_min(),
                calib_max: ch.calib_max(),
                calibrated: ch.is_calibrated(),
            });
            ch.reset_calibration();
        }

        self.state = CalibrationState::Running {
            started_at: now,
            duration_ms,
        };
        log_debug!(
            "calibration started: {} channel(s), {} ms window",
            channels.len(),
            duration_ms
        );
        Ok(())
    }

    /// Advances the run by one control cycle.
    ///
    /// In `Running`, consumes any fresh sample per channel and widens that
    /// channel's bounds; once the window has elapsed, transitions through
    /// `Committing` back to `Idle` and returns the [`CommitReport`].
    /// Returns `None` while idle or still recording.
    pub fn poll(
        &mut self,
        channels: &mut [SensorChannel],
        now: Timestamp,
    ) -> Option<CommitReport> {
        match self.state {
            CalibrationState::Idle => None,
            CalibrationState::Running {
                started_at,
                duration_ms,
            } => {
                for ch in channels.iter_mut() {
                    if let Some(sample) = ch.take_fresh() {
                        ch.observe(sample);
                    }
                }

                if now.saturating_sub(started_at) >= u64::from(duration_ms) {
                    self.state = CalibrationState::Committing;
                    Some(self.commit(channels))
                } else {
                    None
                }
            }
            // Unreachable through poll itself; commit() below always leaves
            // Idle. Kept so the state is handled exhaustively.
            CalibrationState::Committing => Some(self.commit(channels)),
        }
    }

    /// Aborts an active run without committing.
    ///
    /// Each channel's pre-run calibration is restored exactly, including
    /// "never calibrated". No-op when idle.
    pub fn abort(&mut self, channels: &mut [SensorChannel]) {
        if !self.is_active() {
            return;
        }

        for (ch, snap) in channels.iter_mut().zip(self.snapshots.iter()) {
            ch.restore_raw(snap.calib_min, snap.calib_max, snap.calibrated);
        }
        self.snapshots.clear();
        self.state = CalibrationState::Idle;
        log_debug!("calibration aborted, prior calibration restored");
    }

    /// Sanity-checks and commits each channel, then returns to `Idle`.
    fn commit(&mut self, channels: &mut [SensorChannel]) -> CommitReport {
        let mut report = CommitReport::default();
        for ch in channels.iter_mut() {
            match ch.commit_calibration(self.min_span) {
                Ok(()) => report.committed += 1,
                Err(fault) => {
                    log_warn!("calibration commit rejected: {}", fault);
                    report.faults.record(fault);
                }
            }
        }

        self.snapshots.clear();
        self.state = CalibrationState::Idle;
        log_debug!("calibration committed for {} channel(s)", report.committed);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FaultKind;

    fn throttle_pair() -> [SensorChannel; 2] {
        [
            SensorChannel::new("throttle-a", 0.5, 4.5),
            SensorChannel::new("throttle-b", 0.5, 4.5),
        ]
    }

    /// Feeds both channels the same sweep across the run window, one sample
    /// per 5 ms cycle, then returns the commit report.
    fn run_sweep(
        cal: &mut Calibrator,
        channels: &mut [SensorChannel; 2],
        lo: f32,
        hi: f32,
        duration_ms: u32,
    ) -> CommitReport {
        cal.begin(channels, 0, duration_ms).unwrap();

        let cycles = duration_ms / 5;
        let mut report = None;
        for i in 0..=cycles {
            let t = i as f32 / cycles as f32;
            let value = lo + (hi - lo) * t;
            for ch in channels.iter_mut() {
                ch.push_sample(value);
            }
            report = cal.poll(channels, u64::from(i) * 5);
            if report.is_some() {
                break;
            }
        }
        report.expect("run should commit once the window elapses")
    }

    #[test]
    fn begin_resets_bounds_inverted() {
        let mut channels = throttle_pair();
        let mut cal = Calibrator::default();

        channels[0].restore_calibration(1.0, 4.0).unwrap();
        cal.begin(&mut channels, 0, 1000).unwrap();

        assert!(cal.is_active());
        for ch in &channels {
            assert!(!ch.is_calibrated());
            assert_eq!(ch.calib_min(), 4.5);
            assert_eq!(ch.calib_max(), 0.5);
        }
    }

    #[test]
    fn sweep_commits_observed_extremes() {
        let mut channels = throttle_pair();
        let mut cal = Calibrator::default();

        let report = run_sweep(&mut cal, &mut channels, 0.5, 4.5, 1000);

        assert!(report.all_committed());
        assert_eq!(report.committed, 2);
        assert_eq!(cal.state(), CalibrationState::Idle);
        for ch in &channels {
            assert!(ch.is_calibrated());
            assert_eq!(ch.calib_min(), 0.5);
            assert_eq!(ch.calib_max(), 4.5);
        }
    }

    #[test]
    fn poll_before_deadline_keeps_running() {
        let mut channels = throttle_pair();
        let mut cal = Calibrator::default();

        cal.begin(&mut channels, 1000, 500).unwrap();
        channels[0].push_sample(2.0);
        assert!(cal.poll(&mut channels, 1250).is_none());
        assert!(cal.is_active());
    }

    #[test]
    fn stationary_pedal_fails_commit() {
        let mut channels = throttle_pair();
        let mut cal = Calibrator::default();

        // Pedal never moved: both channels read a constant voltage
        let report = run_sweep(&mut cal, &mut channels, 2.0, 2.0, 500);

        assert!(!report.all_committed());
        assert_eq!(report.committed, 0);
        assert_eq!(report.faults.len(), 2);
        assert!(report.faults.has(FaultKind::DegenerateCalibration));
        for ch in &channels {
            assert!(!ch.is_calibrated());
        }
    }

    #[test]
    fn begin_while_running_is_rejected() {
        let mut channels = throttle_pair();
        let mut cal = Calibrator::default();

        cal.begin(&mut channels, 0, 1000).unwrap();
        channels[0].push_sample(1.0);
        cal.poll(&mut channels, 5);

        let err = cal.begin(&mut channels, 10, 1000).unwrap_err();
        assert_eq!(err, CalibrationError::AlreadyRunning);

        // The in-flight run is undisturbed
        assert!(matches!(
            cal.state(),
            CalibrationState::Running { started_at: 0, .. }
        ));
        assert_eq!(channels[0].calib_min(), 1.0);
    }

    #[test]
    fn abort_restores_prior_calibration() {
        let mut channels = throttle_pair();
        let mut cal = Calibrator::default();

        channels[0].restore_calibration(1.0, 4.0).unwrap();

        cal.begin(&mut channels, 0, 1000).unwrap();
        channels[0].push_sample(2.2);
        channels[1].push_sample(2.3);
        cal.poll(&mut channels, 5);
        cal.abort(&mut channels);

        assert_eq!(cal.state(), CalibrationState::Idle);
        // Channel 0 gets its committed range back
        assert!(channels[0].is_calibrated());
        assert_eq!(channels[0].calib_min(), 1.0);
        assert_eq!(channels[0].calib_max(), 4.0);
        // Channel 1 had never been calibrated, and still isn't
        assert!(!channels[1].is_calibrated());
    }

    #[test]
    fn abort_when_idle_is_a_no_op() {
        let mut channels = throttle_pair();
        let mut cal = Calibrator::default();

        channels[0].restore_calibration(1.0, 4.0).unwrap();
        cal.abort(&mut channels);
        assert!(channels[0].is_calibrated());
    }

    #[test]
    fn samples_are_consumed_once() {
        let mut channels = throttle_pair();
        let mut cal = Calibrator::default();

        cal.begin(&mut channels, 0, 1000).unwrap();
        channels[0].push_sample(1.5);
        cal.poll(&mut channels, 5);
        // Second poll sees no fresh sample; bounds unchanged
        cal.poll(&mut channels, 10);

        assert_eq!(channels[0].calib_min(), 1.5);
        assert_eq!(channels[0].calib_max(), 1.5);
    }
}
