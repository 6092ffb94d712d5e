#![forbid(unsafe_code)]

//! Keyed one-shot timer queue on a virtual clock.
//!
//! Every delayed step in the controller (debounce windows, the simulated
//! submission, gallery hide/show staging, announcement removal) is an entry
//! in a [`TimerQueue`] keyed by the logical operation it belongs to.
//!
//! # Invariants
//!
//! 1. **One timer per key**: scheduling a key that is already pending
//!    replaces the earlier deadline. The most recently scheduled timer for a
//!    logical operation always supersedes the previous one.
//! 2. **Deadline order**: [`TimerQueue::drain_due`] yields keys ordered by
//!    deadline; equal deadlines fire in scheduling order.
//! 3. **No wall clock**: the queue only compares against the `now` it is
//!    handed, so tests run against a virtual clock.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use pagectl_core::timer::TimerQueue;
//!
//! let mut q = TimerQueue::new();
//! q.schedule("hide", Duration::from_millis(300));
//! q.schedule("hide", Duration::from_millis(500)); // supersedes
//! assert!(q.drain_due(Duration::from_millis(300)).is_empty());
//! assert_eq!(q.drain_due(Duration::from_millis(500)), vec!["hide"]);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::time::Duration;

/// Ordering key inside the queue: deadline first, then scheduling sequence.
type Slot = (Duration, u64);

/// One-shot timers keyed by logical operation.
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    by_deadline: BTreeMap<Slot, K>,
    by_key: HashMap<K, Slot>,
    seq: u64,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            by_deadline: BTreeMap::new(),
            by_key: HashMap::new(),
            seq: 0,
        }
    }
}

impl<K: Clone + Eq + Hash> TimerQueue<K> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` to fire at absolute time `at`.
    ///
    /// Returns `true` if an earlier pending timer for the same key was
    /// replaced.
    pub fn schedule(&mut self, key: K, at: Duration) -> bool {
        let replaced = self.cancel(&key);
        let slot = (at, self.seq);
        self.seq = self.seq.wrapping_add(1);
        self.by_deadline.insert(slot, key.clone());
        self.by_key.insert(key, slot);
        if replaced {
            tracing::trace!(
                target: "pagectl.timer",
                at_ms = at.as_millis() as u64,
                pending = self.by_key.len(),
                "timer superseded"
            );
        }
        replaced
    }

    /// Schedule `key` to fire `delay` after `now`.
    pub fn schedule_in(&mut self, key: K, now: Duration, delay: Duration) -> bool {
        self.schedule(key, now.saturating_add(delay))
    }

    /// Cancel a pending timer. Returns `true` if one was pending.
    pub fn cancel(&mut self, key: &K) -> bool {
        match self.by_key.remove(key) {
            Some(slot) => {
                self.by_deadline.remove(&slot);
                true
            }
            None => false,
        }
    }

    /// Whether a timer for `key` is pending.
    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.by_key.contains_key(key)
    }

    /// Deadline of a pending timer, if any.
    #[must_use]
    pub fn deadline_of(&self, key: &K) -> Option<Duration> {
        self.by_key.get(key).map(|(at, _)| *at)
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.by_deadline.keys().next().map(|(at, _)| *at)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Remove and return the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<K> {
        let slot = *self.by_deadline.keys().next()?;
        if slot.0 > now {
            return None;
        }
        let key = self.by_deadline.remove(&slot)?;
        self.by_key.remove(&key);
        Some(key)
    }

    /// Remove and return every timer due at or before `now`, in firing order.
    pub fn drain_due(&mut self, now: Duration) -> Vec<K> {
        let mut due = Vec::new();
        while let Some(key) = self.pop_due(now) {
            due.push(key);
        }
        due
    }
}
