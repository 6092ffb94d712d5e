#![forbid(unsafe_code)]

//! Scroll-derived visibility: the sticky call-to-action and header elevation.
//!
//! Both outputs are pure functions of the scroll offset:
//!
//! | Output | Rule | Path |
//! |--------|------|------|
//! | CTA visible | `scroll_y > viewport_height * fraction` | frame-aligned |
//! | Header raised | `scroll_y > header_elevation_px` | debounced |
//!
//! Scroll events only record the latest sample. The CTA recomputes once per
//! rendering frame from the newest sample; the header recomputes on the
//! trailing edge of a short debounce window. Intermediate offsets may be
//! skipped, the final state never is.
//!
//! Outputs are only written when they change, so a stream of scrolls within
//! the same band produces no DOM traffic.

use pagectl_core::config::ScrollConfig;
use pagectl_core::{Debouncer, FrameGate, NodeRef};

use crate::turn::{TimerKey, Turn};

/// Scroll position reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSample {
    pub scroll_y: f64,
    pub viewport_height: f64,
}

/// Whether the sticky CTA should show for `sample`.
#[must_use]
pub fn cta_visible(sample: ScrollSample, fraction: f64) -> bool {
    sample.scroll_y > sample.viewport_height * fraction
}

/// Whether the header should use the raised shadow at `scroll_y`.
#[must_use]
pub fn header_raised(scroll_y: f64, threshold_px: f64) -> bool {
    scroll_y > threshold_px
}

/// Scroll-reactive visibility controller.
#[derive(Debug, Clone)]
pub struct ScrollVisibility {
    cta: Option<NodeRef>,
    header: Option<NodeRef>,
    config: ScrollConfig,
    frame: FrameGate<ScrollSample>,
    header_debounce: Debouncer<f64>,
    cta_visible: Option<bool>,
    header_raised: Option<bool>,
}

impl ScrollVisibility {
    #[must_use]
    pub fn new(cta: Option<NodeRef>, header: Option<NodeRef>, config: ScrollConfig) -> Self {
        let header_debounce = Debouncer::new(config.header_debounce);
        Self {
            cta,
            header,
            config,
            frame: FrameGate::new(),
            header_debounce,
            cta_visible: None,
            header_raised: None,
        }
    }

    /// Last rendered CTA visibility.
    #[must_use]
    pub fn cta_is_visible(&self) -> Option<bool> {
        self.cta_visible
    }

    /// Last rendered header elevation.
    #[must_use]
    pub fn header_is_raised(&self) -> Option<bool> {
        self.header_raised
    }

    /// Record a scroll. Returns `true` if the host must request a frame.
    pub fn on_scroll(&mut self, sample: ScrollSample, turn: &mut Turn<'_>) -> bool {
        if self.header.is_some() {
            let at = self.header_debounce.call(turn.now(), sample.scroll_y);
            turn.schedule_at(TimerKey::HeaderElevation, at);
        }
        // Every scroll goes through the frame gate even without a CTA so the
        // host sees one consistent request cadence.
        self.frame.push(sample)
    }

    /// The requested frame ran: recompute CTA visibility.
    pub fn on_frame(&mut self, turn: &mut Turn<'_>) {
        let Some(sample) = self.frame.take_frame() else {
            return;
        };
        let Some(cta) = self.cta else {
            return;
        };
        let visible = cta_visible(sample, self.config.cta_viewport_fraction);
        if self.cta_visible == Some(visible) {
            return;
        }
        self.cta_visible = Some(visible);
        let patch = turn.patch();
        patch.toggle_class(cta, "visible", visible);
        patch.set_flag(cta, "aria-hidden", !visible);
        tracing::trace!(
            target: "pagectl.scroll",
            scroll_y = sample.scroll_y,
            visible,
            "cta visibility"
        );
    }

    /// The header debounce timer fired.
    pub fn on_header_timer(&mut self, turn: &mut Turn<'_>) {
        let Some(scroll_y) = self.header_debounce.fire_due(turn.now()) else {
            return;
        };
        let Some(header) = self.header else {
            return;
        };
        let raised = header_raised(scroll_y, self.config.header_elevation_px);
        if self.header_raised == Some(raised) {
            return;
        }
        self.header_raised = Some(raised);
        let shadow = if raised {
            self.config.header_shadow_raised.clone()
        } else {
            self.config.header_shadow_resting.clone()
        };
        turn.patch().set_style(header, "box-shadow", shadow);
        tracing::trace!(target: "pagectl.scroll", scroll_y, raised, "header elevation");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagectl_core::{DomOp, Patch, TimerQueue};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    const CTA: NodeRef = NodeRef(1);
    const HEADER: NodeRef = NodeRef(2);

    fn sample(scroll_y: f64) -> ScrollSample {
        ScrollSample {
            scroll_y,
            viewport_height: 800.0,
        }
    }

    #[test]
    fn cta_threshold_is_strict() {
        assert!(!cta_visible(sample(400.0), 0.5));
        assert!(cta_visible(sample(400.5), 0.5));
        assert!(!header_raised(50.0, 50.0));
        assert!(header_raised(51.0, 50.0));
    }

    #[test]
    fn frame_uses_latest_sample_only() {
        let mut sv = ScrollVisibility::new(Some(CTA), None, ScrollConfig::default());
        let mut timers = TimerQueue::new();
        let mut patch = Patch::new();
        let mut turn = Turn::new(Duration::ZERO, &mut patch, &mut timers);
        assert!(sv.on_scroll(sample(900.0), &mut turn));
        assert!(!sv.on_scroll(sample(100.0), &mut turn));
        sv.on_frame(&mut turn);
        assert_eq!(sv.cta_is_visible(), Some(false));
        assert_eq!(
            patch.ops(),
            &[
                DomOp::ToggleClass {
                    node: CTA,
                    class: "visible",
                    on: false
                },
                DomOp::SetAttr {
                    node: CTA,
                    name: "aria-hidden",
                    value: "true".into()
                },
            ]
        );
    }

    #[test]
    fn unchanged_visibility_writes_nothing() {
        let mut sv = ScrollVisibility::new(Some(CTA), None, ScrollConfig::default());
        let mut timers = TimerQueue::new();
        let mut patch = Patch::new();
        let mut turn = Turn::new(Duration::ZERO, &mut patch, &mut timers);
        sv.on_scroll(sample(900.0), &mut turn);
        sv.on_frame(&mut turn);
        sv.on_scroll(sample(950.0), &mut turn);
        sv.on_frame(&mut turn);
        assert_eq!(patch.len(), 2);
    }

    #[test]
    fn header_updates_on_trailing_edge() {
        let mut sv = ScrollVisibility::new(None, Some(HEADER), ScrollConfig::default());
        let mut timers = TimerQueue::new();
        let mut patch = Patch::new();

        let mut turn = Turn::new(Duration::ZERO, &mut patch, &mut timers);
        sv.on_scroll(sample(10.0), &mut turn);
        let mut turn = Turn::new(Duration::from_millis(5), &mut patch, &mut timers);
        sv.on_scroll(sample(120.0), &mut turn);

        assert_eq!(timers.next_deadline(), Some(Duration::from_millis(15)));
        assert_eq!(timers.drain_due(Duration::from_millis(15)), vec![TimerKey::HeaderElevation]);

        let mut turn = Turn::new(Duration::from_millis(15), &mut patch, &mut timers);
        sv.on_header_timer(&mut turn);
        assert_eq!(sv.header_is_raised(), Some(true));
        assert_eq!(
            patch.ops(),
            &[DomOp::SetStyle {
                node: HEADER,
                property: "box-shadow",
                value: Some("0 4px 20px rgba(0, 0, 0, 0.15)".into())
            }]
        );
    }
}
