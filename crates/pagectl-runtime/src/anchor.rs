#![forbid(unsafe_code)]

//! In-page anchor navigation that clears the sticky header.

use pagectl_core::config::AnchorConfig;
use pagectl_core::{DomOp, NodeRef, Patch, TransitionMode};

use crate::markup::AnchorMarkup;

/// A resolved jump to an in-page target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorJump {
    pub target: NodeRef,
    /// Absolute document offset to scroll to.
    pub top: f64,
}

/// Smooth-scroll handler for `href="#..."` links.
#[derive(Debug, Clone)]
pub struct AnchorNav {
    anchors: Vec<AnchorMarkup>,
    config: AnchorConfig,
}

impl AnchorNav {
    #[must_use]
    pub fn new(anchors: Vec<AnchorMarkup>, config: AnchorConfig) -> Self {
        Self { anchors, config }
    }

    /// Resolve a click on anchor `index`.
    ///
    /// `target_top` is the target's viewport-relative top edge at click time.
    /// Returns `None` for a bare `#` or a link without a matching target; the
    /// browser's default action then proceeds untouched.
    #[must_use]
    pub fn resolve(
        &self,
        index: usize,
        target_top: f64,
        scroll_y: f64,
        header_height: f64,
    ) -> Option<AnchorJump> {
        let anchor = self.anchors.get(index)?;
        if anchor.href == "#" {
            return None;
        }
        let target = anchor.target?;
        Some(AnchorJump {
            target,
            top: target_top + scroll_y - header_height - self.config.scroll_margin_px,
        })
    }

    /// Emit the scroll and focus hand-off for `jump`.
    pub fn render(jump: AnchorJump, mode: TransitionMode, patch: &mut Patch) {
        patch.push(DomOp::ScrollTo {
            top: jump.top,
            smooth: mode.is_animated(),
        });
        patch.set_attr(jump.target, "tabindex", "-1");
        patch.focus_in_place(jump.target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn nav() -> AnchorNav {
        AnchorNav::new(
            vec![
                AnchorMarkup {
                    link: NodeRef(1),
                    href: "#".into(),
                    target: None,
                },
                AnchorMarkup {
                    link: NodeRef(2),
                    href: "#contact".into(),
                    target: Some(NodeRef(9)),
                },
                AnchorMarkup {
                    link: NodeRef(3),
                    href: "#missing".into(),
                    target: None,
                },
            ],
            AnchorConfig::default(),
        )
    }

    #[test]
    fn offset_clears_header_and_margin() {
        let jump = nav().resolve(1, 300.0, 1000.0, 80.0).unwrap();
        assert_eq!(jump.target, NodeRef(9));
        assert_eq!(jump.top, 1200.0);
    }

    #[test]
    fn bare_hash_and_missing_target_are_ignored() {
        assert_eq!(nav().resolve(0, 0.0, 0.0, 0.0), None);
        assert_eq!(nav().resolve(2, 0.0, 0.0, 0.0), None);
        assert_eq!(nav().resolve(7, 0.0, 0.0, 0.0), None);
    }

    #[test]
    fn reduced_motion_jumps_instantly() {
        let mut patch = Patch::new();
        AnchorNav::render(
            AnchorJump {
                target: NodeRef(9),
                top: 10.0,
            },
            TransitionMode::Instant,
            &mut patch,
        );
        assert_eq!(
            patch.ops()[0],
            DomOp::ScrollTo {
                top: 10.0,
                smooth: false
            }
        );
        assert_eq!(
            patch.ops()[2],
            DomOp::Focus {
                node: NodeRef(9),
                prevent_scroll: true
            }
        );
    }
}
