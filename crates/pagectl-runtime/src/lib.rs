#![forbid(unsafe_code)]

//! Interaction state machines for a marketing page.
//!
//! The [`SiteController`] owns one component per page concern and turns host
//! events into declarative [`Patch`](pagectl_core::Patch)es:
//!
//! | Component | Concern |
//! |-----------|---------|
//! | [`nav`] | mobile menu, focus trap, dropdowns |
//! | [`scroll`] | sticky call-to-action and header elevation |
//! | [`viewport`] | lazy images and entrance reveals |
//! | [`form`] | field validation, phone formatting, submission lifecycle |
//! | [`filter`] | gallery filtering with staged transitions |
//! | [`anchor`] | in-page links that clear the sticky header |
//! | [`faq`] | disclosure state mirroring |
//! | [`tracking`] | conversion and engagement reports |
//!
//! Time is supplied by the host on every call and timers live in a single
//! queue owned by the controller, so the whole runtime is deterministic under
//! test.

pub mod anchor;
pub mod controller;
pub mod event;
pub mod faq;
pub mod filter;
pub mod form;
pub mod markup;
pub mod nav;
pub mod scroll;
pub mod tracking;
pub mod turn;
pub mod viewport;

pub use controller::{SiteController, SiteControllerBuilder};
pub use event::{Key, Outcome, PageEvent};
pub use form::{
    ContactPayload, FieldId, FormData, SimulatedSubmission, SubmissionOutcome, SubmissionPhase,
    SubmissionSink, SubmitResult,
};
pub use markup::{
    AnchorMarkup, DropdownMarkup, FaqMarkup, FieldMarkup, FilterButtonMarkup, FormMarkup,
    GalleryItemMarkup, LazyImageMarkup, Markup, MenuMarkup,
};
pub use turn::TimerKey;
