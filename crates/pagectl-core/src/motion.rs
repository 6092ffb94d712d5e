#![forbid(unsafe_code)]

//! Reduced-motion gate.
//!
//! Every component that performs an animated transition asks the gate which
//! path to take. The preference is queried on each call and never cached, so
//! a user flipping the system setting mid-session takes effect on the next
//! transition.

/// How a transition should be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionMode {
    /// Timed, animated transition.
    Animated,
    /// Apply the final visual state immediately.
    Instant,
}

impl TransitionMode {
    /// Whether intermediate timed steps should run.
    #[must_use]
    pub const fn is_animated(self) -> bool {
        matches!(self, Self::Animated)
    }
}

/// Source of the user's "reduce motion" preference.
pub trait MotionPreference {
    /// Whether reduced motion is currently requested.
    fn prefers_reduced_motion(&self) -> bool;

    /// Transition path implied by the current preference.
    fn transition_mode(&self) -> TransitionMode {
        if self.prefers_reduced_motion() {
            TransitionMode::Instant
        } else {
            TransitionMode::Animated
        }
    }
}

/// A preference that never changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedMotion {
    pub reduced: bool,
}

impl FixedMotion {
    /// Animations allowed.
    pub const ANIMATED: Self = Self { reduced: false };
    /// Reduced motion requested.
    pub const REDUCED: Self = Self { reduced: true };
}

impl MotionPreference for FixedMotion {
    fn prefers_reduced_motion(&self) -> bool {
        self.reduced
    }
}

impl<F> MotionPreference for F
where
    F: Fn() -> bool,
{
    fn prefers_reduced_motion(&self) -> bool {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn fixed_preference_selects_path() {
        assert_eq!(FixedMotion::ANIMATED.transition_mode(), TransitionMode::Animated);
        assert_eq!(FixedMotion::REDUCED.transition_mode(), TransitionMode::Instant);
        assert!(!TransitionMode::Instant.is_animated());
    }

    #[test]
    fn closure_preference_is_reevaluated_each_call() {
        let flag = Cell::new(false);
        let pref = || flag.get();
        assert_eq!(pref.transition_mode(), TransitionMode::Animated);
        flag.set(true);
        assert_eq!(pref.transition_mode(), TransitionMode::Instant);
    }
}
