//! Time sources for the control cycle
//!
//! The calibration controller needs elapsed-time queries to bound its
//! recording window, but it consumes plain [`Timestamp`] values rather than
//! owning a clock. This module provides the clock abstraction the
//! control-cycle driver uses to produce those timestamps:
//! - [`SystemTime`] for hosted targets (std)
//! - [`FixedTime`] for deterministic tests

/// Timestamp in milliseconds (since epoch, or device boot for monotonic
/// tick counters).
pub type Timestamp = u64;

/// Source of time for the control cycle.
///
/// Implementations should be monotonic over the lifetime of a calibration
/// run; elapsed-time math uses saturating subtraction, so a backwards step
/// stalls a run rather than panicking.
pub trait TimeSource {
    /// Current timestamp in milliseconds.
    fn now(&self) -> Timestamp;
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Fixed time source for testing
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Creates a source pinned at `timestamp`.
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Sets the current timestamp.
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Advances the current timestamp by `ms`.
    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_time_advances() {
        let mut time = FixedTime::new(1000);
        assert_eq!(time.now(), 1000);

        time.advance(500);
        assert_eq!(time.now(), 1500);
    }

    #[test]
    fn fixed_time_set() {
        let mut time = FixedTime::new(0);
        time.set(42_000);
        assert_eq!(time.now(), 42_000);
    }

    #[cfg(feature = "std")]
    #[test]
    fn system_time_is_nonzero() {
        assert!(SystemTime.now() > 0);
    }
}
