#![forbid(unsafe_code)]

//! pagectl public facade crate.
//!
//! Re-exports the controller, its event and patch vocabulary, and the
//! collaborator traits a host implements. Most hosts only need the
//! [`prelude`].
//!
//! ```
//! use pagectl::prelude::*;
//! use std::time::Duration;
//!
//! let mut controller = SiteController::builder(Markup::default()).build();
//! let _initial = controller.init();
//! let outcome = controller.dispatch(Duration::ZERO, PageEvent::MenuButtonClicked);
//! assert!(outcome.patch.is_empty());
//! ```

// --- Core re-exports -------------------------------------------------------

pub use pagectl_core::{
    Analytics, AnnouncementId, CapabilityError, ConfigError, ConversionPixel, DomOp, EventProps,
    FixedMotion, MotionPreference, NoAnalytics, NoOfflineSupport, NoPixel, NodeRef, ObserverKind,
    ObserverOptions, OfflineSupport, Patch, SiteConfig, TransitionMode, ViewportObserver,
};

// --- Runtime re-exports ----------------------------------------------------

pub use pagectl_runtime::{
    ContactPayload, FieldId, FormData, Key, Markup, Outcome, PageEvent, SimulatedSubmission,
    SiteController, SiteControllerBuilder, SubmissionOutcome, SubmissionPhase, SubmissionSink,
};

/// Everything a host needs to build and drive a controller.
pub mod prelude {
    pub use crate::{
        Analytics, ConversionPixel, DomOp, FormData, Key, Markup, MotionPreference, NodeRef,
        ObserverKind, OfflineSupport, Outcome, PageEvent, Patch, SiteConfig, SiteController,
        SubmissionSink, ViewportObserver,
    };

    pub use crate::{core, runtime};
}

pub use pagectl_core as core;
pub use pagectl_runtime as runtime;
