#![forbid(unsafe_code)]

//! Host events fed to the controller, and what a dispatch hands back.

use pagectl_core::{NodeRef, ObserverKind, Patch};

use crate::form::FormData;

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Tab { shift: bool },
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom(key: &str, shift: bool) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab { shift },
            _ => Self::Other,
        }
    }
}

/// One browser event, already reduced to the data the controller needs.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// The window finished loading.
    Loaded { secure_context: bool },
    /// The mobile menu button was activated.
    MenuButtonClicked,
    /// A link inside the navigation panel was activated.
    NavLinkClicked { viewport_width: f64 },
    /// A click anywhere in the document. `inside_menu` is true when the
    /// target lies within the navigation panel or the menu button.
    DocumentClicked { inside_menu: bool },
    /// A key went down. `focused` is the element holding focus, if known.
    /// `hidden` lists panel focusables that are not rendered right now (for
    /// example links inside a collapsed dropdown); Tab skips them.
    KeyDown {
        key: Key,
        focused: Option<NodeRef>,
        hidden: Vec<NodeRef>,
    },
    /// Dropdown toggle `index` was activated.
    DropdownToggleClicked { index: usize, viewport_width: f64 },
    /// The window scrolled.
    Scrolled { scroll_y: f64, viewport_height: f64 },
    /// The frame callback requested by a previous scroll ran.
    AnimationFrame,
    /// In-page link `index` was activated. Geometry is measured at click time.
    AnchorClicked {
        index: usize,
        target_top: f64,
        scroll_y: f64,
        header_height: f64,
    },
    /// A form field lost focus.
    FieldBlurred { node: NodeRef, value: String },
    /// A form field's value changed.
    FieldInput { node: NodeRef, value: String },
    /// The contact form was submitted.
    FormSubmitted { data: FormData },
    /// An observed element crossed its visibility threshold.
    Intersection {
        kind: ObserverKind,
        node: NodeRef,
        is_intersecting: bool,
    },
    /// Disclosure `index` opened or closed.
    FaqToggled { index: usize, open: bool },
    /// A `tel:` link was activated.
    TelLinkClicked,
    /// The user is about to print.
    BeforePrint { title: String },
    /// Gallery filter control `index` was activated.
    FilterClicked { index: usize },
}

impl PageEvent {
    /// Short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Loaded { .. } => "loaded",
            Self::MenuButtonClicked => "menu_button",
            Self::NavLinkClicked { .. } => "nav_link",
            Self::DocumentClicked { .. } => "document_click",
            Self::KeyDown { .. } => "keydown",
            Self::DropdownToggleClicked { .. } => "dropdown_toggle",
            Self::Scrolled { .. } => "scroll",
            Self::AnimationFrame => "frame",
            Self::AnchorClicked { .. } => "anchor",
            Self::FieldBlurred { .. } => "blur",
            Self::FieldInput { .. } => "input",
            Self::FormSubmitted { .. } => "submit",
            Self::Intersection { .. } => "intersection",
            Self::FaqToggled { .. } => "faq_toggle",
            Self::TelLinkClicked => "tel_link",
            Self::BeforePrint { .. } => "beforeprint",
            Self::FilterClicked { .. } => "filter",
        }
    }
}

/// Result of dispatching one event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// DOM mutations to apply, in order.
    pub patch: Patch,
    /// Whether the host must call `preventDefault()` on the event.
    pub prevent_default: bool,
    /// Whether the host must request an animation frame callback.
    pub request_frame: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_key_mapping() {
        assert_eq!(Key::from_dom("Escape", false), Key::Escape);
        assert_eq!(Key::from_dom("Esc", true), Key::Escape);
        assert_eq!(Key::from_dom("Tab", true), Key::Tab { shift: true });
        assert_eq!(Key::from_dom("a", false), Key::Other);
    }
}
