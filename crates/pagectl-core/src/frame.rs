#![forbid(unsafe_code)]

//! Rendering-frame alignment for scroll-rate input.
//!
//! Scroll events can arrive many times per frame. [`FrameGate`] keeps only the
//! most recent sample ("latest wins") and asks the host for at most one frame
//! callback until that callback has run.
//!
//! # Usage
//!
//! ```
//! use pagectl_core::frame::FrameGate;
//!
//! let mut gate = FrameGate::new();
//! assert!(gate.push(10.0));   // first sample: request a frame
//! assert!(!gate.push(20.0));  // frame already requested: coalesced
//! assert_eq!(gate.take_frame(), Some(20.0));
//! assert_eq!(gate.take_frame(), None);
//! ```

/// Coalesces samples until the next rendering frame.
#[derive(Debug, Clone)]
pub struct FrameGate<T> {
    latest: Option<T>,
    ticking: bool,
    coalesced: u64,
}

impl<T> Default for FrameGate<T> {
    fn default() -> Self {
        Self {
            latest: None,
            ticking: false,
            coalesced: 0,
        }
    }
}

impl<T> FrameGate<T> {
    /// Create an idle gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sample.
    ///
    /// Returns `true` when the caller must request a frame callback, i.e. no
    /// frame is outstanding yet.
    pub fn push(&mut self, sample: T) -> bool {
        if self.latest.is_some() {
            self.coalesced += 1;
        }
        self.latest = Some(sample);
        if self.ticking {
            false
        } else {
            self.ticking = true;
            true
        }
    }

    /// Run the frame: clear the outstanding request and return the newest
    /// sample, if any arrived since the previous frame.
    pub fn take_frame(&mut self) -> Option<T> {
        self.ticking = false;
        self.latest.take()
    }

    /// Whether a frame callback is outstanding.
    #[must_use]
    pub const fn is_ticking(&self) -> bool {
        self.ticking
    }

    /// Samples superseded before a frame consumed them.
    #[must_use]
    pub const fn coalesced(&self) -> u64 {
        self.coalesced
    }
}
