#![forbid(unsafe_code)]

//! The markup contract: which elements the host found on the page.
//!
//! The host scans the document once and describes every element set the
//! controller understands. An empty or `None` entry simply leaves the
//! corresponding subsystem inactive.

use pagectl_core::NodeRef;

use crate::form::FieldId;

/// Everything the controller may drive on one page.
#[derive(Debug, Clone, Default)]
pub struct Markup {
    pub menu: Option<MenuMarkup>,
    pub dropdowns: Vec<DropdownMarkup>,
    pub sticky_cta: Option<NodeRef>,
    pub header: Option<NodeRef>,
    pub contact_form: Option<FormMarkup>,
    /// Input that receives live phone formatting.
    pub phone_input: Option<NodeRef>,
    pub lazy_images: Vec<LazyImageMarkup>,
    /// Cards that get an entrance animation.
    pub reveal_targets: Vec<NodeRef>,
    pub faq_items: Vec<FaqMarkup>,
    pub filter_buttons: Vec<FilterButtonMarkup>,
    pub gallery_items: Vec<GalleryItemMarkup>,
    /// In-page `href="#..."` links.
    pub anchors: Vec<AnchorMarkup>,
    /// `href="tel:..."` links.
    pub tel_links: Vec<NodeRef>,
}

/// Mobile menu button and the navigation panel it controls.
#[derive(Debug, Clone)]
pub struct MenuMarkup {
    pub button: NodeRef,
    pub panel: NodeRef,
    /// Focusable descendants of the panel, in document order.
    pub focusables: Vec<NodeRef>,
}

/// A dropdown toggle and its containing dropdown element.
#[derive(Debug, Clone, Copy)]
pub struct DropdownMarkup {
    pub toggle: NodeRef,
    pub container: NodeRef,
}

/// The contact form.
#[derive(Debug, Clone)]
pub struct FormMarkup {
    pub form: NodeRef,
    pub submit: NodeRef,
    /// Required, validated inputs in document order.
    pub fields: Vec<FieldMarkup>,
}

/// A validated input and the element that displays its error text.
#[derive(Debug, Clone, Copy)]
pub struct FieldMarkup {
    pub id: FieldId,
    pub input: NodeRef,
    /// Sibling carrying the `error-message` class, if present.
    pub error_slot: Option<NodeRef>,
}

/// An image with staged resource references.
#[derive(Debug, Clone)]
pub struct LazyImageMarkup {
    pub node: NodeRef,
    pub data_src: Option<String>,
    pub data_srcset: Option<String>,
}

/// A disclosure element and its summary.
#[derive(Debug, Clone, Copy)]
pub struct FaqMarkup {
    pub details: NodeRef,
    pub summary: Option<NodeRef>,
}

/// A gallery filter control.
#[derive(Debug, Clone)]
pub struct FilterButtonMarkup {
    pub node: NodeRef,
    /// Category id, or `"all"`.
    pub filter: String,
    /// Authored with the `active` class.
    pub initially_active: bool,
}

/// A filterable gallery card.
#[derive(Debug, Clone)]
pub struct GalleryItemMarkup {
    pub node: NodeRef,
    pub category: String,
}

/// An in-page link.
#[derive(Debug, Clone)]
pub struct AnchorMarkup {
    pub link: NodeRef,
    pub href: String,
    /// Element matching `href`, if one exists.
    pub target: Option<NodeRef>,
}
