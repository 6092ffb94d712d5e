#![forbid(unsafe_code)]

//! Test harness for the pagectl runtime.
//!
//! - [`document`]: a headless document that applies patches and checksums its
//!   state.
//! - [`fakes`]: recording implementations of every collaborator.
//! - [`fixture`]: a canonical page driven by a virtual clock.
//! - [`transcript`]: JSONL run logs for determinism checks.

pub mod document;
pub mod fakes;
pub mod fixture;
pub mod transcript;

pub use document::{Element, HeadlessDocument};
pub use fakes::{
    MotionToggle, RecordingAnalytics, RecordingObserver, RecordingOffline, RecordingPixel,
    RecordingSink,
};
pub use fixture::{SiteFixture, SiteFixtureBuilder, canonical_markup, input_of, nodes};
pub use transcript::Transcript;
