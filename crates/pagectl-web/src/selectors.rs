#![forbid(unsafe_code)]

//! CSS selectors and ids the document scan looks for.
//!
//! These are the hooks the site's markup and style sheet agree on. Changing
//! one here without the markup silently deactivates a subsystem.

pub const MENU_BUTTON_ID: &str = "mobile-menu-btn";
pub const NAV_PANEL_ID: &str = "main-nav";
/// Focus-trap candidates inside the open panel.
pub const PANEL_FOCUSABLES: &str = "a, button";
pub const NAV_LINKS: &str = "a";

pub const DROPDOWN_TOGGLE: &str = ".dropdown-toggle";
pub const DROPDOWN: &str = ".nav-dropdown";

pub const STICKY_CTA_ID: &str = "mobile-cta";
pub const HEADER: &str = ".header";

pub const CONTACT_FORM_ID: &str = "contact-form";
pub const REQUIRED_INPUTS: &str = "input[required]";
pub const SUBMIT_BUTTON: &str = ".btn-submit";
/// Class of the sibling that shows a field's error text.
pub const ERROR_SLOT_CLASS: &str = "error-message";
pub const PHONE_INPUT_ID: &str = "phone";
/// Multi-valued form controls copied into the submission payload.
pub const EXTRA_FORM_NAMES: [&str; 2] = ["services", "message"];

pub const LAZY_IMAGES: &str = "img[data-src], img[data-srcset]";
pub const REVEAL_TARGETS: &str = ".service-card, .benefit-item, .area-card, .testimonial-card";

pub const FAQ_ITEMS: &str = ".faq-item";
pub const FAQ_SUMMARY: &str = "summary";

pub const FILTER_BUTTONS: &str = ".filter-btn";
pub const GALLERY_ITEMS: &str = ".gallery-item";
/// Filter value assumed when a button has no `data-filter`.
pub const FILTER_ALL: &str = "all";

pub const ANCHORS: &str = "a[href^=\"#\"]";
pub const TEL_LINKS: &str = "a[href^=\"tel:\"]";

/// Media query behind the reduced-motion preference.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Class and ARIA attributes of appended live regions.
pub const LIVE_REGION_CLASS: &str = "visually-hidden";

/// Whether an in-page `href` names a target element to look up.
///
/// A bare `#` is a placeholder link and never has a target.
#[must_use]
pub fn anchor_has_target(href: &str) -> bool {
    href.len() > 1 && href.starts_with('#')
}
