#![forbid(unsafe_code)]

//! Per-dispatch context shared by the components.

use std::time::Duration;

use pagectl_core::{AnnouncementId, Patch, TimerQueue};

/// Logical operations that own a pending timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// Trailing edge of the header elevation debounce.
    HeaderElevation,
    /// Simulated remote acknowledgment of the contact form.
    SubmissionSettle,
    /// Staged show/hide step of gallery item `n`.
    GalleryItem(usize),
    /// Removal of a status announcement.
    Announcement(AnnouncementId),
}

/// One controller turn: the current time, the patch being built, and the
/// timer queue components schedule into.
#[derive(Debug)]
pub struct Turn<'a> {
    now: Duration,
    patch: &'a mut Patch,
    timers: &'a mut TimerQueue<TimerKey>,
}

impl<'a> Turn<'a> {
    pub fn new(now: Duration, patch: &'a mut Patch, timers: &'a mut TimerQueue<TimerKey>) -> Self {
        Self { now, patch, timers }
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn patch(&mut self) -> &mut Patch {
        self.patch
    }

    /// Schedule `key` `delay` from now, superseding any pending timer for it.
    pub fn schedule_in(&mut self, key: TimerKey, delay: Duration) {
        self.timers.schedule_in(key, self.now, delay);
    }

    /// Schedule `key` at absolute time `at`.
    pub fn schedule_at(&mut self, key: TimerKey, at: Duration) {
        self.timers.schedule(key, at);
    }

    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.timers.cancel(&key)
    }

    #[must_use]
    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.timers.is_pending(&key)
    }
}
