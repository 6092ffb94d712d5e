#![forbid(unsafe_code)]

//! Replaying the same interaction script yields the same transcript, and the
//! controller's invariants hold under arbitrary event interleavings.

use pagectl_core::ObserverKind;
use pagectl_harness::fixture::{NARROW_WIDTH, VIEWPORT_HEIGHT};
use pagectl_harness::{SiteFixture, nodes};
use pagectl_runtime::{Key, PageEvent};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn scripted_session() -> String {
    let mut f = SiteFixture::new();
    f.dispatch(PageEvent::Loaded {
        secure_context: true,
    });
    f.click_menu();
    f.press(Key::Tab { shift: true });
    f.click_dropdown(0, NARROW_WIDTH);
    f.press(Key::Escape);
    f.scroll_to(650.0);
    f.advance_ms(16);
    f.intersect(ObserverKind::LazyImage, nodes::LAZY_IMAGES[0], true);
    f.click_filter(2);
    f.advance_ms(120);
    f.click_filter(1);
    f.fill_valid_form();
    f.submit();
    f.advance_ms(2_000);
    f.transcript().to_jsonl()
}

#[test]
fn same_script_same_transcript() {
    let first = scripted_session();
    let second = scripted_session();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[derive(Debug, Clone)]
enum Step {
    Event(PageEvent),
    Wait(u64),
    Frame,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Event(PageEvent::MenuButtonClicked)),
        Just(Step::Event(PageEvent::KeyDown {
            key: Key::Escape,
            focused: None,
            hidden: Vec::new(),
        })),
        Just(Step::Event(PageEvent::DocumentClicked { inside_menu: false })),
        (0usize..3).prop_map(|index| Step::Event(PageEvent::DropdownToggleClicked {
            index,
            viewport_width: NARROW_WIDTH,
        })),
        (0usize..4).prop_map(|index| Step::Event(PageEvent::FilterClicked { index })),
        (0.0f64..2_000.0).prop_map(|scroll_y| Step::Event(PageEvent::Scrolled {
            scroll_y,
            viewport_height: VIEWPORT_HEIGHT,
        })),
        (0usize..3, any::<bool>()).prop_map(|(i, is_intersecting)| {
            Step::Event(PageEvent::Intersection {
                kind: ObserverKind::LazyImage,
                node: nodes::LAZY_IMAGES[i],
                is_intersecting,
            })
        }),
        (1u64..400).prop_map(Step::Wait),
        Just(Step::Frame),
    ]
}

proptest! {
    #[test]
    fn invariants_hold_under_any_interleaving(steps in proptest::collection::vec(step(), 1..60)) {
        let mut f = SiteFixture::new();
        let mut loaded = 0;
        for step in steps {
            match step {
                Step::Event(event) => {
                    f.dispatch(event);
                }
                Step::Wait(ms) => f.advance_ms(ms),
                Step::Frame => {
                    f.run_frame();
                }
            }

            let expanded = nodes::DROPDOWNS
                .iter()
                .filter(|&&d| f.doc().has_class(d, "active"))
                .count();
            prop_assert!(expanded <= 1);

            let open = f.controller().menu_open();
            prop_assert_eq!(f.doc().body_locked(), open);
            prop_assert_eq!(f.doc().has_class(nodes::NAV_PANEL, "active"), open);

            let active_buttons = nodes::FILTER_BUTTONS
                .iter()
                .filter(|&&b| f.doc().has_class(b, "active"))
                .count();
            prop_assert_eq!(active_buttons, 1);

            prop_assert!(f.controller().images_loaded() >= loaded);
            loaded = f.controller().images_loaded();
        }

        // Let every staged transition finish: the layout then matches the
        // active filter exactly.
        f.advance_ms(5_000);
        let filter = f.controller().active_filter().to_owned();
        for (i, &item) in nodes::GALLERY_ITEMS.iter().enumerate() {
            let category = pagectl_harness::fixture::CATEGORIES[i];
            let shown = filter == "all" || filter == category;
            let display = f.doc().style(item, "display");
            if shown {
                prop_assert!(display.is_none() || display.as_deref() == Some("block"));
            } else {
                prop_assert_eq!(display.as_deref(), Some("none"));
            }
        }
        prop_assert!(f.doc().live_announcements().is_empty());
    }
}
