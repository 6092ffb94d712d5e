#![forbid(unsafe_code)]

//! Fire-once viewport behaviors: deferred image loading and entrance reveals.
//!
//! Both behaviors share [`FireOnce`]: an element is observed, fires on its
//! first qualifying intersection, and is then unobserved for good.
//!
//! # Invariants
//!
//! 1. **Monotonic**: once an element has fired it never reverts and never
//!    fires again, however often it re-enters the viewport.
//! 2. **Bounded observation**: every element is unobserved in the same turn
//!    it fires, so the active observation set only shrinks.
//!
//! # Failure Modes
//!
//! | Condition | Lazy images | Reveal |
//! |-----------|-------------|--------|
//! | No observer primitive | every image loads at start | no offset applied; content shows as authored |
//! | Reduced motion | unaffected | no offset applied; content shows as authored |
//! | Event for unknown node | ignored | ignored |

use std::collections::BTreeSet;

use pagectl_core::config::ViewportConfig;
use pagectl_core::{DomOp, NodeRef, ObserverKind, Patch, TransitionMode, ViewportObserver};

use crate::markup::LazyImageMarkup;

/// Style rule that cancels the pre-entrance offset.
pub const REVEAL_CSS: &str = ".animate-in { opacity: 1 !important; transform: translateY(0) !important; }";

/// Observation bookkeeping for one fire-once behavior.
#[derive(Debug, Clone)]
pub struct FireOnce {
    kind: ObserverKind,
    observing: BTreeSet<NodeRef>,
    fired: BTreeSet<NodeRef>,
}

impl FireOnce {
    #[must_use]
    pub fn new(kind: ObserverKind) -> Self {
        Self {
            kind,
            observing: BTreeSet::new(),
            fired: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ObserverKind {
        self.kind
    }

    /// Start observing `node` unless it already fired.
    pub fn observe(&mut self, node: NodeRef) -> bool {
        !self.fired.contains(&node) && self.observing.insert(node)
    }

    /// Mark `node` fired without it ever being observed (fallback path).
    pub fn force(&mut self, node: NodeRef) -> bool {
        self.observing.remove(&node);
        self.fired.insert(node)
    }

    /// Feed an intersection report. Returns `true` exactly once per observed
    /// node: on its first intersecting report.
    pub fn on_intersection(&mut self, node: NodeRef, is_intersecting: bool) -> bool {
        if !is_intersecting || !self.observing.contains(&node) {
            return false;
        }
        self.observing.remove(&node);
        self.fired.insert(node)
    }

    #[must_use]
    pub fn has_fired(&self, node: NodeRef) -> bool {
        self.fired.contains(&node)
    }

    /// Number of elements still observed.
    #[must_use]
    pub fn observing(&self) -> usize {
        self.observing.len()
    }

    #[must_use]
    pub fn fired_count(&self) -> usize {
        self.fired.len()
    }
}

/// Deferred image loading.
#[derive(Debug, Clone)]
pub struct LazyImages {
    images: Vec<LazyImageMarkup>,
    tracker: FireOnce,
}

impl LazyImages {
    #[must_use]
    pub fn new(images: Vec<LazyImageMarkup>) -> Self {
        Self {
            images,
            tracker: FireOnce::new(ObserverKind::LazyImage),
        }
    }

    #[must_use]
    pub fn tracker(&self) -> &FireOnce {
        &self.tracker
    }

    /// Begin observation, or load everything when no observer exists.
    pub fn start(
        &mut self,
        observer: Option<&dyn ViewportObserver>,
        config: &ViewportConfig,
        patch: &mut Patch,
    ) {
        match observer {
            Some(observer) => {
                let options = config.lazy_options();
                for image in &self.images {
                    if self.tracker.observe(image.node) {
                        observer.observe(ObserverKind::LazyImage, image.node, &options);
                    }
                }
            }
            None => {
                for image in &self.images {
                    if self.tracker.force(image.node) {
                        swap_in(image, patch);
                    }
                }
                tracing::debug!(
                    target: "pagectl.viewport",
                    images = self.images.len(),
                    "no observer; loading images eagerly"
                );
            }
        }
    }

    /// Handle an intersection report for the lazy-image observer.
    pub fn on_intersection(
        &mut self,
        node: NodeRef,
        is_intersecting: bool,
        observer: Option<&dyn ViewportObserver>,
        patch: &mut Patch,
    ) {
        if !self.tracker.on_intersection(node, is_intersecting) {
            return;
        }
        if let Some(image) = self.images.iter().find(|i| i.node == node) {
            swap_in(image, patch);
        }
        if let Some(observer) = observer {
            observer.unobserve(ObserverKind::LazyImage, node);
        }
        tracing::trace!(target: "pagectl.viewport", %node, "image loaded");
    }
}

fn swap_in(image: &LazyImageMarkup, patch: &mut Patch) {
    if let Some(src) = &image.data_src {
        patch.set_attr(image.node, "src", src.clone());
        patch.remove_attr(image.node, "data-src");
    }
    if let Some(srcset) = &image.data_srcset {
        patch.set_attr(image.node, "srcset", srcset.clone());
        patch.remove_attr(image.node, "data-srcset");
    }
    patch.toggle_class(image.node, "loaded", true);
}

/// Entrance animation for cards.
#[derive(Debug, Clone)]
pub struct Reveal {
    targets: Vec<NodeRef>,
    tracker: FireOnce,
    active: bool,
}

impl Reveal {
    #[must_use]
    pub fn new(targets: Vec<NodeRef>) -> Self {
        Self {
            targets,
            tracker: FireOnce::new(ObserverKind::Reveal),
            active: false,
        }
    }

    /// Whether targets were authored with the pre-entrance offset.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn tracker(&self) -> &FireOnce {
        &self.tracker
    }

    /// Apply the pre-entrance offset and begin observation, but only when
    /// animation is allowed and an observer exists.
    pub fn start(
        &mut self,
        observer: Option<&dyn ViewportObserver>,
        mode: TransitionMode,
        config: &ViewportConfig,
        patch: &mut Patch,
    ) {
        let Some(observer) = observer else {
            tracing::debug!(target: "pagectl.viewport", "no observer; reveal disabled");
            return;
        };
        if !mode.is_animated() || self.targets.is_empty() {
            return;
        }
        self.active = true;
        patch.push(DomOp::InjectStyle {
            css: REVEAL_CSS.to_owned(),
        });
        let options = config.reveal_options();
        let transition = config.reveal_transition();
        for &node in &self.targets {
            patch.set_style(node, "opacity", "0");
            patch.set_style(node, "transform", config.reveal_offset.clone());
            patch.set_style(node, "transition", transition.clone());
            if self.tracker.observe(node) {
                observer.observe(ObserverKind::Reveal, node, &options);
            }
        }
    }

    /// Handle an intersection report for the reveal observer.
    pub fn on_intersection(
        &mut self,
        node: NodeRef,
        is_intersecting: bool,
        observer: Option<&dyn ViewportObserver>,
        patch: &mut Patch,
    ) {
        if !self.tracker.on_intersection(node, is_intersecting) {
            return;
        }
        patch.toggle_class(node, "animate-in", true);
        if let Some(observer) = observer {
            observer.unobserve(ObserverKind::Reveal, node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fire_once_is_monotonic() {
        let mut t = FireOnce::new(ObserverKind::LazyImage);
        let n = NodeRef(5);
        assert!(!t.on_intersection(n, true), "unobserved nodes never fire");
        assert!(t.observe(n));
        assert!(!t.observe(n));
        assert!(!t.on_intersection(n, false));
        assert!(t.on_intersection(n, true));
        for _ in 0..3 {
            assert!(!t.on_intersection(n, false));
            assert!(!t.on_intersection(n, true));
        }
        assert!(t.has_fired(n));
        assert_eq!(t.observing(), 0);
        assert!(!t.observe(n), "fired nodes are never re-observed");
    }

    #[test]
    fn fallback_loads_every_image() {
        let mut lazy = LazyImages::new(vec![
            LazyImageMarkup {
                node: NodeRef(1),
                data_src: Some("a.jpg".into()),
                data_srcset: None,
            },
            LazyImageMarkup {
                node: NodeRef(2),
                data_src: None,
                data_srcset: Some("b.jpg 1x".into()),
            },
        ]);
        let mut patch = Patch::new();
        lazy.start(None, &ViewportConfig::default(), &mut patch);
        assert_eq!(lazy.tracker().fired_count(), 2);
        assert_eq!(
            patch.ops_for(NodeRef(1)).cloned().collect::<Vec<_>>(),
            vec![
                DomOp::SetAttr {
                    node: NodeRef(1),
                    name: "src",
                    value: "a.jpg".into()
                },
                DomOp::RemoveAttr {
                    node: NodeRef(1),
                    name: "data-src"
                },
                DomOp::ToggleClass {
                    node: NodeRef(1),
                    class: "loaded",
                    on: true
                },
            ]
        );
    }

    #[test]
    fn reveal_is_inert_without_observer() {
        let mut reveal = Reveal::new(vec![NodeRef(1)]);
        let mut patch = Patch::new();
        reveal.start(None, TransitionMode::Animated, &ViewportConfig::default(), &mut patch);
        assert!(!reveal.is_active());
        assert!(patch.is_empty());
    }
}
