#![forbid(unsafe_code)]

//! Monotonic time as seen by the controller.
//!
//! The controller never reads a wall clock itself. The host passes the
//! current monotonic time with every event, and tests drive a
//! [`DeterministicClock`] by hand.

use core::time::Duration;

/// Source of monotonic time.
pub trait Clock {
    /// Current monotonic time since an arbitrary, fixed origin.
    fn now(&self) -> Duration;
}

/// Deterministic monotonic clock controlled by the host or a test.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    /// Advance monotonic time by `ms` milliseconds.
    pub fn advance_ms(&mut self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Clock for DeterministicClock {
    fn now(&self) -> Duration {
        self.now
    }
}
