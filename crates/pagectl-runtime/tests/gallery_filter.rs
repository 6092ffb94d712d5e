#![forbid(unsafe_code)]

//! Gallery filtering with staged transitions, announcements and the
//! reduced-motion path.

use pagectl_harness::{SiteFixture, nodes};
use pretty_assertions::assert_eq;

const PLUMBING: usize = 1;
const ELECTRICAL: usize = 2;

#[test]
fn init_mirrors_authored_pressed_state() {
    let f = SiteFixture::new();
    assert_eq!(f.controller().active_filter(), "all");
    assert_eq!(f.controller().visible_items(), 3);
    let pressed: Vec<_> = nodes::FILTER_BUTTONS
        .iter()
        .map(|&b| f.doc().attr(b, "aria-pressed"))
        .collect();
    assert_eq!(
        pressed,
        [Some("true".to_owned()), Some("false".to_owned()), Some("false".to_owned())]
    );
    for &item in &nodes::GALLERY_ITEMS {
        assert_eq!(
            f.doc().style(item, "transition").as_deref(),
            Some("opacity 300ms ease, transform 300ms ease")
        );
    }
}

#[test]
fn plumbing_filter_shows_two_items_and_announces_count() {
    let mut f = SiteFixture::new();
    f.click_filter(PLUMBING);

    assert_eq!(f.controller().active_filter(), "plumbing");
    assert_eq!(f.controller().visible_items(), 2);
    let live = f.doc().live_announcements();
    assert_eq!(live.len(), 1);
    assert!(live[0].contains('2'));
    assert_eq!(live[0], "Showing 2 plumbing items");

    let doc = f.doc();
    assert!(doc.has_class(nodes::FILTER_BUTTONS[PLUMBING], "active"));
    assert!(!doc.has_class(nodes::FILTER_BUTTONS[0], "active"));
    assert_eq!(
        doc.attr(nodes::FILTER_BUTTONS[PLUMBING], "aria-pressed").as_deref(),
        Some("true")
    );
    assert_eq!(
        doc.attr(nodes::FILTER_BUTTONS[0], "aria-pressed").as_deref(),
        Some("false")
    );
}

#[test]
fn animated_filter_stages_show_and_hide() {
    let mut f = SiteFixture::new();
    let [kept, hidden, _] = nodes::GALLERY_ITEMS;
    f.click_filter(PLUMBING);

    assert_eq!(f.doc().style(kept, "display").as_deref(), Some("block"));
    assert_eq!(f.doc().style(hidden, "opacity").as_deref(), Some("0"));
    assert_eq!(f.doc().style(hidden, "transform").as_deref(), Some("scale(0.95)"));
    assert_eq!(f.doc().style(hidden, "display"), None, "still in layout while fading");

    f.advance_ms(10);
    assert_eq!(f.doc().style(kept, "opacity").as_deref(), Some("1"));
    assert_eq!(f.doc().style(kept, "transform").as_deref(), Some("scale(1)"));

    f.advance_ms(289);
    assert_eq!(f.doc().style(hidden, "display"), None);
    f.advance_ms(1);
    assert_eq!(f.doc().style(hidden, "display").as_deref(), Some("none"));
}

#[test]
fn announcement_is_removed_after_its_lifetime() {
    let mut f = SiteFixture::new();
    f.click_filter(ELECTRICAL);
    f.advance_ms(999);
    assert_eq!(f.doc().live_announcements(), ["Showing 1 electrical items"]);
    f.advance_ms(1);
    assert!(f.doc().live_announcements().is_empty());
    assert_eq!(f.doc().announcement_history().len(), 1);
}

#[test]
fn newer_selection_cancels_pending_collapse() {
    let mut f = SiteFixture::new();
    let first = nodes::GALLERY_ITEMS[0];
    f.click_filter(ELECTRICAL);
    f.advance_ms(100);
    f.click_filter(0);
    f.advance_ms(1_000);

    assert_eq!(f.doc().style(first, "display").as_deref(), Some("block"));
    assert_eq!(f.doc().style(first, "opacity").as_deref(), Some("1"));
    assert_eq!(f.controller().visible_items(), 3);
}

#[test]
fn reduced_motion_applies_final_state_in_same_turn() {
    let mut f = SiteFixture::builder().reduced_motion(true).build();
    let [first, second, third] = nodes::GALLERY_ITEMS;
    f.click_filter(ELECTRICAL);

    assert_eq!(f.doc().style(first, "display").as_deref(), Some("none"));
    assert_eq!(f.doc().style(third, "display").as_deref(), Some("none"));
    assert_eq!(f.doc().style(second, "display").as_deref(), Some("block"));
    assert_eq!(f.doc().style(second, "opacity").as_deref(), Some("1"));
    assert_eq!(f.controller().pending_timers(), 1, "only the announcement is timed");
}

#[test]
fn reduced_motion_never_declares_item_transition() {
    let mut f = SiteFixture::builder().reduced_motion(true).build();
    f.click_filter(PLUMBING);
    f.click_filter(0);
    for &item in &nodes::GALLERY_ITEMS {
        assert_eq!(f.doc().style(item, "transition"), None);
    }
}

#[test]
fn switching_to_reduced_motion_drops_item_transition() {
    let mut f = SiteFixture::new();
    f.click_filter(PLUMBING);
    f.motion.set_reduced(true);
    f.click_filter(0);
    for &item in &nodes::GALLERY_ITEMS {
        assert_eq!(f.doc().style(item, "transition"), None);
        assert_eq!(f.doc().style(item, "opacity").as_deref(), Some("1"));
    }
}

#[test]
fn motion_preference_is_read_on_every_selection() {
    let mut f = SiteFixture::new();
    f.motion.set_reduced(true);
    f.click_filter(PLUMBING);
    assert_eq!(
        f.doc().style(nodes::GALLERY_ITEMS[1], "display").as_deref(),
        Some("none")
    );
    assert_eq!(f.controller().pending_timers(), 1);
}
