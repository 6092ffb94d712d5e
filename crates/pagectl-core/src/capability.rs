#![forbid(unsafe_code)]

//! Injected collaborator interfaces.
//!
//! Optional browser globals (the analytics reporter, the conversion pixel, the
//! offline worker registry, the viewport observation primitive) are modelled
//! as trait objects handed to the controller at construction. Each trait has a
//! no-op implementation so an absent collaborator is just another value, not a
//! scattered existence check.
//!
//! # Failure Modes
//!
//! | Collaborator | When absent | When it fails |
//! |--------------|-------------|---------------|
//! | [`Analytics`] | [`NoAnalytics`] drops events | n/a (fire-and-forget) |
//! | [`ConversionPixel`] | [`NoPixel`] drops events | n/a (fire-and-forget) |
//! | [`OfflineSupport`] | [`NoOfflineSupport`] reports `Unavailable` | caller logs and ignores |
//! | [`ViewportObserver`] | controller holds `None` | n/a; controller shows all content immediately |

use serde_json::{Map, Value};

use crate::dom::NodeRef;
use crate::error::CapabilityError;

/// Structured properties attached to an analytics event.
pub type EventProps = Map<String, Value>;

/// Event-reporting collaborator (a `gtag`-style global).
pub trait Analytics {
    /// Report `event` with `props`. Must not block.
    fn event(&self, event: &str, props: &EventProps);
}

/// Analytics sink used when no reporter is present.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnalytics;

impl Analytics for NoAnalytics {
    fn event(&self, _event: &str, _props: &EventProps) {}
}

/// Pixel-tracking collaborator (an `fbq`-style global).
pub trait ConversionPixel {
    /// Track a standard conversion event.
    fn track(&self, event: &str);
}

/// Pixel used when no tracker is present.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPixel;

impl ConversionPixel for NoPixel {
    fn track(&self, _event: &str) {}
}

/// Background asset-caching worker registry.
pub trait OfflineSupport {
    /// Register the worker script at `script_url`.
    fn register(&self, script_url: &str) -> Result<(), CapabilityError>;
}

/// Registry used when the environment has no worker support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOfflineSupport;

impl OfflineSupport for NoOfflineSupport {
    fn register(&self, _script_url: &str) -> Result<(), CapabilityError> {
        Err(CapabilityError::Unavailable("offline support"))
    }
}

/// Which fire-once behavior an observation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObserverKind {
    /// Deferred image loading.
    LazyImage,
    /// Entrance animation.
    Reveal,
}

/// Observation options, mirroring the browser primitive's init dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    /// CSS-style margin grown around the viewport, e.g. `"50px 0px"`.
    pub root_margin: String,
    /// Minimal visible fraction in `[0, 1]`.
    pub threshold: f64,
}

/// Viewport intersection primitive.
///
/// Implementations report crossings back to the controller as
/// `PageEvent::Intersection` events; they never call into it directly.
pub trait ViewportObserver {
    /// Start watching `node` for the behavior `kind`.
    fn observe(&self, kind: ObserverKind, node: NodeRef, options: &ObserverOptions);
    /// Stop watching `node` for the behavior `kind`.
    fn unobserve(&self, kind: ObserverKind, node: NodeRef);
}

/// Build [`EventProps`] from string pairs.
#[must_use]
pub fn props<'a>(pairs: impl IntoIterator<Item = (&'a str, Value)>) -> EventProps {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect()
}
