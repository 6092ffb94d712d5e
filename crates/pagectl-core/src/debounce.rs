#![forbid(unsafe_code)]

//! Trailing-edge debouncing for high-frequency event streams.
//!
//! A [`Debouncer`] wraps "calls" carrying a payload. Each call cancels the
//! pending one and restarts the quiet window, so a burst of calls collapses
//! into a single firing carrying the last payload once the stream has been
//! quiet for `delay`.
//!
//! # Invariants
//!
//! 1. At most one call is pending per debouncer.
//! 2. The last call of a burst always fires eventually (trailing edge); calls
//!    are delayed, never dropped without a later call replacing them.
//! 3. A firing consumes the pending call, so the underlying handler can never
//!    observe the same call twice.
//!
//! The debouncer does not own a timer. The caller polls [`Debouncer::fire_due`]
//! when its own clock reaches [`Debouncer::deadline`].

use std::time::Duration;

/// Trailing-edge debouncer over a payload of type `T`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Duration, T)>,
    fired: u64,
}

impl<T> Debouncer<T> {
    /// Create a debouncer with quiet window `delay`.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            fired: 0,
        }
    }

    /// Quiet window length.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a call at `now`, replacing any pending one.
    ///
    /// Returns the new deadline at which the call becomes due.
    pub fn call(&mut self, now: Duration, payload: T) -> Duration {
        let at = now.saturating_add(self.delay);
        if self.pending.replace((at, payload)).is_some() {
            tracing::trace!(
                target: "pagectl.debounce",
                at_ms = at.as_millis() as u64,
                "quiet window restarted"
            );
        }
        at
    }

    /// Deadline of the pending call, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    /// Whether a call is waiting for its quiet window to elapse.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending payload if its deadline has passed.
    pub fn fire_due(&mut self, now: Duration) -> Option<T> {
        match &self.pending {
            Some((at, _)) if *at <= now => {
                self.fired += 1;
                tracing::trace!(target: "pagectl.debounce", fired = self.fired, "debounce fired");
                self.pending.take().map(|(_, payload)| payload)
            }
            _ => None,
        }
    }

    /// Drop the pending call without firing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, payload)| payload)
    }

    /// Number of times the debouncer has fired.
    #[must_use]
    pub const fn fired(&self) -> u64 {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn single_call_fires_after_delay() {
        let mut d = Debouncer::new(ms(10));
        assert_eq!(d.call(ms(0), 1), ms(10));
        assert_eq!(d.fire_due(ms(9)), None);
        assert_eq!(d.fire_due(ms(10)), Some(1));
        assert_eq!(d.fire_due(ms(20)), None);
        assert_eq!(d.fired(), 1);
    }

    #[test]
    fn burst_collapses_to_last_payload() {
        let mut d = Debouncer::new(ms(10));
        d.call(ms(0), "a");
        d.call(ms(5), "b");
        d.call(ms(12), "c");
        assert_eq!(d.deadline(), Some(ms(22)));
        assert_eq!(d.fire_due(ms(15)), None);
        assert_eq!(d.fire_due(ms(22)), Some("c"));
        assert!(!d.is_pending());
    }

    #[test]
    fn cancel_discards_pending_call() {
        let mut d = Debouncer::new(ms(10));
        d.call(ms(0), 7);
        assert_eq!(d.cancel(), Some(7));
        assert_eq!(d.fire_due(ms(100)), None);
        assert_eq!(d.fired(), 0);
    }

    proptest! {
        #[test]
        fn burst_within_window_fires_exactly_once(
            gaps in proptest::collection::vec(0u64..10, 1..40)
        ) {
            let mut d = Debouncer::new(ms(10));
            let mut now = 0u64;
            let mut last = 0usize;
            for (i, gap) in gaps.iter().enumerate() {
                now += gap;
                // Never due mid-burst: every gap is shorter than the window.
                prop_assert_eq!(d.fire_due(ms(now)), None);
                d.call(ms(now), i);
                last = i;
            }
            prop_assert_eq!(d.fire_due(ms(now + 10)), Some(last));
            prop_assert_eq!(d.fired(), 1);
        }
    }
}
