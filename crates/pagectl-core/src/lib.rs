#![forbid(unsafe_code)]

//! Leaf building blocks for the pagectl interaction controller.
//!
//! - [`clock`]: host-driven monotonic time.
//! - [`timer`]: keyed one-shot timers with supersede semantics.
//! - [`debounce`]: trailing-edge debouncing.
//! - [`frame`]: rendering-frame coalescing for scroll-rate input.
//! - [`motion`]: the reduced-motion gate.
//! - [`dom`]: the declarative patch model components emit.
//! - [`capability`]: injected collaborator interfaces with no-op defaults.
//! - [`config`]: named timing and threshold values.
//!
//! Nothing here touches a browser; the wasm binding and the test harness both
//! sit on top of these types.

pub mod capability;
pub mod clock;
pub mod config;
pub mod debounce;
pub mod dom;
pub mod error;
pub mod frame;
pub mod motion;
pub mod timer;

pub use capability::{
    Analytics, ConversionPixel, EventProps, NoAnalytics, NoOfflineSupport, NoPixel, ObserverKind,
    ObserverOptions, OfflineSupport, ViewportObserver,
};
pub use clock::{Clock, DeterministicClock};
pub use config::SiteConfig;
pub use debounce::Debouncer;
pub use dom::{AnnouncementId, DomOp, NodeRef, Patch};
pub use error::{CapabilityError, ConfigError};
pub use frame::FrameGate;
pub use motion::{FixedMotion, MotionPreference, TransitionMode};
pub use timer::TimerQueue;
