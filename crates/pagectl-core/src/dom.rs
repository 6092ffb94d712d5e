#![forbid(unsafe_code)]

//! Declarative DOM output.
//!
//! Components never mutate a document. They describe the attributes, classes,
//! styles and focus moves they want as a [`Patch`] of [`DomOp`]s, and a thin
//! renderer (the wasm binding, or the headless harness document) applies it.
//!
//! Elements are addressed by [`NodeRef`] handles that the host hands out when
//! it scans the page.

use std::fmt;

/// Opaque handle to an element registered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(pub u32);

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a transient screen-reader announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnouncementId(pub u64);

/// A single DOM mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum DomOp {
    /// Set an attribute.
    SetAttr {
        node: NodeRef,
        name: &'static str,
        value: String,
    },
    /// Remove an attribute.
    RemoveAttr { node: NodeRef, name: &'static str },
    /// Add (`on = true`) or remove a class.
    ToggleClass {
        node: NodeRef,
        class: &'static str,
        on: bool,
    },
    /// Set an inline style property, or clear it with `None`.
    SetStyle {
        node: NodeRef,
        property: &'static str,
        value: Option<String>,
    },
    /// Replace the value of a form control.
    SetValue { node: NodeRef, value: String },
    /// Enable or disable a form control.
    SetDisabled { node: NodeRef, disabled: bool },
    /// Replace the text content of an element.
    SetText { node: NodeRef, text: String },
    /// Move keyboard focus.
    Focus { node: NodeRef, prevent_scroll: bool },
    /// Lock (`true`) or release page scrolling.
    LockBodyScroll(bool),
    /// Scroll the window to a vertical offset.
    ScrollTo { top: f64, smooth: bool },
    /// Reset every control of a form to its authored default.
    ResetForm { form: NodeRef },
    /// Append a style sheet to the document head.
    InjectStyle { css: String },
    /// Append a polite, visually hidden live region.
    Announce { id: AnnouncementId, text: String },
    /// Remove a live region previously appended with [`DomOp::Announce`].
    RemoveAnnouncement { id: AnnouncementId },
    /// Show a blocking user notification.
    Alert { message: String },
}

impl DomOp {
    /// Element the operation targets, if it targets one.
    #[must_use]
    pub fn node(&self) -> Option<NodeRef> {
        match self {
            Self::SetAttr { node, .. }
            | Self::RemoveAttr { node, .. }
            | Self::ToggleClass { node, .. }
            | Self::SetStyle { node, .. }
            | Self::SetValue { node, .. }
            | Self::SetDisabled { node, .. }
            | Self::SetText { node, .. }
            | Self::Focus { node, .. } => Some(*node),
            Self::ResetForm { form } => Some(*form),
            Self::LockBodyScroll(_)
            | Self::ScrollTo { .. }
            | Self::InjectStyle { .. }
            | Self::Announce { .. }
            | Self::RemoveAnnouncement { .. }
            | Self::Alert { .. } => None,
        }
    }
}

/// Ordered list of DOM mutations produced by one controller turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    ops: Vec<DomOp>,
}

impl Patch {
    /// Create an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw operation.
    pub fn push(&mut self, op: DomOp) {
        self.ops.push(op);
    }

    /// Append all operations of `other`.
    pub fn extend(&mut self, other: Patch) {
        self.ops.extend(other.ops);
    }

    pub fn set_attr(&mut self, node: NodeRef, name: &'static str, value: impl Into<String>) {
        self.push(DomOp::SetAttr {
            node,
            name,
            value: value.into(),
        });
    }

    /// Set a boolean ARIA-style attribute to `"true"`/`"false"`.
    pub fn set_flag(&mut self, node: NodeRef, name: &'static str, value: bool) {
        self.set_attr(node, name, if value { "true" } else { "false" });
    }

    pub fn remove_attr(&mut self, node: NodeRef, name: &'static str) {
        self.push(DomOp::RemoveAttr { node, name });
    }

    pub fn toggle_class(&mut self, node: NodeRef, class: &'static str, on: bool) {
        self.push(DomOp::ToggleClass { node, class, on });
    }

    pub fn set_style(&mut self, node: NodeRef, property: &'static str, value: impl Into<String>) {
        self.push(DomOp::SetStyle {
            node,
            property,
            value: Some(value.into()),
        });
    }

    pub fn clear_style(&mut self, node: NodeRef, property: &'static str) {
        self.push(DomOp::SetStyle {
            node,
            property,
            value: None,
        });
    }

    pub fn set_value(&mut self, node: NodeRef, value: impl Into<String>) {
        self.push(DomOp::SetValue {
            node,
            value: value.into(),
        });
    }

    pub fn set_disabled(&mut self, node: NodeRef, disabled: bool) {
        self.push(DomOp::SetDisabled { node, disabled });
    }

    pub fn set_text(&mut self, node: NodeRef, text: impl Into<String>) {
        self.push(DomOp::SetText {
            node,
            text: text.into(),
        });
    }

    pub fn focus(&mut self, node: NodeRef) {
        self.push(DomOp::Focus {
            node,
            prevent_scroll: false,
        });
    }

    /// Move focus without letting the browser scroll the element into view.
    pub fn focus_in_place(&mut self, node: NodeRef) {
        self.push(DomOp::Focus {
            node,
            prevent_scroll: true,
        });
    }

    /// Operations in application order.
    #[must_use]
    pub fn ops(&self) -> &[DomOp] {
        &self.ops
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Whether any operation moves focus.
    #[must_use]
    pub fn moves_focus(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, DomOp::Focus { .. }))
    }

    /// Operations that target `node`.
    pub fn ops_for(&self, node: NodeRef) -> impl Iterator<Item = &DomOp> + '_ {
        self.ops.iter().filter(move |op| op.node() == Some(node))
    }
}

impl IntoIterator for Patch {
    type Item = DomOp;
    type IntoIter = std::vec::IntoIter<DomOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a Patch {
    type Item = &'a DomOp;
    type IntoIter = std::slice::Iter<'a, DomOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_preserves_order() {
        let n = NodeRef(3);
        let mut p = Patch::new();
        p.set_flag(n, "aria-expanded", true);
        p.toggle_class(n, "active", true);
        p.focus(n);
        assert_eq!(
            p.ops(),
            &[
                DomOp::SetAttr {
                    node: n,
                    name: "aria-expanded",
                    value: "true".into()
                },
                DomOp::ToggleClass {
                    node: n,
                    class: "active",
                    on: true
                },
                DomOp::Focus {
                    node: n,
                    prevent_scroll: false
                },
            ]
        );
        assert!(p.moves_focus());
    }

    #[test]
    fn ops_for_filters_by_target() {
        let mut p = Patch::new();
        p.set_value(NodeRef(1), "a");
        p.set_value(NodeRef(2), "b");
        p.push(DomOp::LockBodyScroll(true));
        assert_eq!(p.ops_for(NodeRef(2)).count(), 1);
        assert_eq!(p.len(), 3);
    }
}
