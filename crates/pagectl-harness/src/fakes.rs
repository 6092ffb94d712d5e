#![forbid(unsafe_code)]

//! Recording collaborators.
//!
//! Each fake is a cheap handle around shared state: clone it, hand one clone
//! to the controller, keep the other to inspect what happened.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pagectl_core::{
    Analytics, CapabilityError, ConversionPixel, EventProps, MotionPreference, NodeRef,
    ObserverKind, ObserverOptions, OfflineSupport, ViewportObserver,
};
use pagectl_runtime::{ContactPayload, SubmissionSink};

/// Analytics reporter that records every event.
#[derive(Debug, Clone, Default)]
pub struct RecordingAnalytics {
    events: Rc<RefCell<Vec<(String, EventProps)>>>,
}

impl RecordingAnalytics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<(String, EventProps)> {
        self.events.borrow().clone()
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.events.borrow().iter().map(|(n, _)| n.clone()).collect()
    }

    /// Properties of the most recent event named `name`.
    #[must_use]
    pub fn last(&self, name: &str) -> Option<EventProps> {
        self.events
            .borrow()
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p.clone())
    }
}

impl Analytics for RecordingAnalytics {
    fn event(&self, event: &str, props: &EventProps) {
        self.events
            .borrow_mut()
            .push((event.to_owned(), props.clone()));
    }
}

/// Conversion pixel that records tracked events.
#[derive(Debug, Clone, Default)]
pub struct RecordingPixel {
    tracked: Rc<RefCell<Vec<String>>>,
}

impl RecordingPixel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tracked(&self) -> Vec<String> {
        self.tracked.borrow().clone()
    }
}

impl ConversionPixel for RecordingPixel {
    fn track(&self, event: &str) {
        self.tracked.borrow_mut().push(event.to_owned());
    }
}

#[derive(Debug, Default)]
struct ObserverState {
    active: Vec<(ObserverKind, NodeRef, ObserverOptions)>,
    observe_calls: usize,
    unobserve_calls: usize,
}

/// Viewport observer that tracks the active observation set.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    state: Rc<RefCell<ObserverState>>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_observing(&self, kind: ObserverKind, node: NodeRef) -> bool {
        self.state
            .borrow()
            .active
            .iter()
            .any(|(k, n, _)| *k == kind && *n == node)
    }

    /// Size of the active observation set.
    #[must_use]
    pub fn active(&self) -> usize {
        self.state.borrow().active.len()
    }

    #[must_use]
    pub fn options_for(&self, kind: ObserverKind, node: NodeRef) -> Option<ObserverOptions> {
        self.state
            .borrow()
            .active
            .iter()
            .find(|(k, n, _)| *k == kind && *n == node)
            .map(|(_, _, o)| o.clone())
    }

    #[must_use]
    pub fn observe_calls(&self) -> usize {
        self.state.borrow().observe_calls
    }

    #[must_use]
    pub fn unobserve_calls(&self) -> usize {
        self.state.borrow().unobserve_calls
    }
}

impl ViewportObserver for RecordingObserver {
    fn observe(&self, kind: ObserverKind, node: NodeRef, options: &ObserverOptions) {
        let mut state = self.state.borrow_mut();
        state.observe_calls += 1;
        if !state.active.iter().any(|(k, n, _)| *k == kind && *n == node) {
            state.active.push((kind, node, options.clone()));
        }
    }

    fn unobserve(&self, kind: ObserverKind, node: NodeRef) {
        let mut state = self.state.borrow_mut();
        state.unobserve_calls += 1;
        state.active.retain(|(k, n, _)| !(*k == kind && *n == node));
    }
}

/// Offline worker registry that records registrations and answers with a
/// fixed result.
#[derive(Debug, Clone)]
pub struct RecordingOffline {
    registrations: Rc<RefCell<Vec<String>>>,
    result: Result<(), CapabilityError>,
}

impl Default for RecordingOffline {
    fn default() -> Self {
        Self::accepting()
    }
}

impl RecordingOffline {
    #[must_use]
    pub fn accepting() -> Self {
        Self {
            registrations: Rc::default(),
            result: Ok(()),
        }
    }

    #[must_use]
    pub fn rejecting(reason: &str) -> Self {
        Self {
            registrations: Rc::default(),
            result: Err(CapabilityError::Rejected(reason.to_owned())),
        }
    }

    #[must_use]
    pub fn registrations(&self) -> Vec<String> {
        self.registrations.borrow().clone()
    }
}

impl OfflineSupport for RecordingOffline {
    fn register(&self, script_url: &str) -> Result<(), CapabilityError> {
        self.registrations.borrow_mut().push(script_url.to_owned());
        self.result.clone()
    }
}

/// Motion preference that can flip while the page runs.
#[derive(Debug, Clone, Default)]
pub struct MotionToggle {
    reduced: Rc<Cell<bool>>,
}

impl MotionToggle {
    #[must_use]
    pub fn new(reduced: bool) -> Self {
        Self {
            reduced: Rc::new(Cell::new(reduced)),
        }
    }

    pub fn set_reduced(&self, reduced: bool) {
        self.reduced.set(reduced);
    }
}

impl MotionPreference for MotionToggle {
    fn prefers_reduced_motion(&self) -> bool {
        self.reduced.get()
    }
}

/// Submission sink that records payloads and can be told to fail.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    payloads: Rc<RefCell<Vec<ContactPayload>>>,
    failing: Rc<Cell<bool>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    #[must_use]
    pub fn payloads(&self) -> Vec<ContactPayload> {
        self.payloads.borrow().clone()
    }
}

impl SubmissionSink for RecordingSink {
    fn submit(&self, payload: &ContactPayload) -> Result<(), CapabilityError> {
        self.payloads.borrow_mut().push(payload.clone());
        if self.failing.get() {
            Err(CapabilityError::Rejected("remote unavailable".to_owned()))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clones_share_state() {
        let observer = RecordingObserver::new();
        let handle = observer.clone();
        let options = ObserverOptions {
            root_margin: "0px".into(),
            threshold: 0.1,
        };
        observer.observe(ObserverKind::Reveal, NodeRef(1), &options);
        observer.observe(ObserverKind::Reveal, NodeRef(1), &options);
        assert_eq!(handle.active(), 1);
        assert_eq!(handle.observe_calls(), 2);
        observer.unobserve(ObserverKind::Reveal, NodeRef(1));
        assert_eq!(handle.active(), 0);
    }

    #[test]
    fn motion_toggle_is_read_live() {
        let motion = MotionToggle::new(false);
        let handle = motion.clone();
        assert!(!motion.prefers_reduced_motion());
        handle.set_reduced(true);
        assert!(motion.prefers_reduced_motion());
    }

    #[test]
    fn rejecting_offline_still_records() {
        let offline = RecordingOffline::rejecting("insecure");
        assert!(offline.register("/sw.js").is_err());
        assert_eq!(offline.registrations(), vec!["/sw.js".to_owned()]);
    }
}
