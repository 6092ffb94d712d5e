#![forbid(unsafe_code)]

//! Anchor navigation, disclosures, engagement tracking and offline
//! registration.

use pagectl_core::SiteConfig;
use pagectl_harness::fixture::canonical_markup;
use pagectl_harness::{RecordingOffline, SiteFixture, nodes};
use pagectl_runtime::{PageEvent, SiteController};
use pretty_assertions::assert_eq;
use serde_json::json;

const CONTACT: usize = 1;

#[test]
fn anchor_jump_clears_header_and_hands_focus_to_target() {
    let mut f = SiteFixture::new();
    let out = f.click_anchor(CONTACT, 500.0);

    assert!(out.prevent_default);
    let doc = f.doc();
    // 500 + 0 - 80 header - 20 margin
    assert_eq!(doc.scroll_y(), 400.0);
    assert_eq!(doc.last_scroll_smooth(), Some(true));
    assert_eq!(doc.attr(nodes::CONTACT_SECTION, "tabindex").as_deref(), Some("-1"));
    assert_eq!(doc.focused(), Some(nodes::CONTACT_SECTION));
}

#[test]
fn anchor_jump_accounts_for_current_scroll_and_closes_menu() {
    let mut f = SiteFixture::new();
    f.click_anchor(CONTACT, 500.0);
    f.click_menu();
    assert!(f.controller().menu_open());

    f.click_anchor(CONTACT, 100.0);
    assert!(!f.controller().menu_open());
    assert!(!f.doc().body_locked());
    assert_eq!(f.doc().scroll_y(), 400.0);
}

#[test]
fn bare_hash_and_missing_targets_keep_default_action() {
    let mut f = SiteFixture::new();
    for index in [0, 2] {
        let out = f.click_anchor(index, 300.0);
        assert!(!out.prevent_default);
        assert!(out.patch.is_empty());
    }
}

#[test]
fn reduced_motion_jumps_instantly() {
    let mut f = SiteFixture::builder().reduced_motion(true).build();
    f.click_anchor(CONTACT, 500.0);
    assert_eq!(f.doc().last_scroll_smooth(), Some(false));
}

#[test]
fn faq_toggle_mirrors_into_summary() {
    let mut f = SiteFixture::new();
    f.dispatch(PageEvent::FaqToggled {
        index: 1,
        open: true,
    });
    assert_eq!(
        f.doc().attr(nodes::FAQ_SUMMARIES[1], "aria-expanded").as_deref(),
        Some("true")
    );
    assert_eq!(f.doc().attr(nodes::FAQ_SUMMARIES[0], "aria-expanded"), None);

    f.dispatch(PageEvent::FaqToggled {
        index: 1,
        open: false,
    });
    assert_eq!(
        f.doc().attr(nodes::FAQ_SUMMARIES[1], "aria-expanded").as_deref(),
        Some("false")
    );
}

#[test]
fn phone_link_reports_contact_conversion() {
    let mut f = SiteFixture::new();
    f.dispatch(PageEvent::TelLinkClicked);

    let click = f.analytics.last("click").expect("click reported");
    assert_eq!(click.get("event_category"), Some(&json!("Contact")));
    assert_eq!(click.get("event_label"), Some(&json!("Phone Call")));
    assert_eq!(click.get("value"), Some(&json!(1)));
    assert_eq!(f.pixel.tracked(), ["Contact"]);
}

#[test]
fn print_reports_document_title() {
    let mut f = SiteFixture::new();
    f.dispatch(PageEvent::BeforePrint {
        title: "Hudson Pressure Pros".into(),
    });
    let print = f.analytics.last("print").expect("print reported");
    assert_eq!(print.get("event_category"), Some(&json!("Engagement")));
    assert_eq!(print.get("event_label"), Some(&json!("Hudson Pressure Pros")));
}

#[test]
fn offline_worker_registers_once_in_secure_context() {
    let mut f = SiteFixture::new();
    f.dispatch(PageEvent::Loaded {
        secure_context: false,
    });
    assert!(f.offline.registrations().is_empty());

    f.dispatch(PageEvent::Loaded {
        secure_context: true,
    });
    f.dispatch(PageEvent::Loaded {
        secure_context: true,
    });
    assert_eq!(f.offline.registrations(), ["/sw.js"]);
}

#[test]
fn rejected_offline_registration_is_harmless() {
    let mut f = SiteFixture::builder()
        .offline(RecordingOffline::rejecting("blocked"))
        .build();
    let out = f.dispatch(PageEvent::Loaded {
        secure_context: true,
    });
    assert!(out.patch.is_empty());
    assert_eq!(f.offline.registrations().len(), 1);
}

#[test]
fn init_runs_once() {
    let mut controller = SiteController::builder(canonical_markup())
        .config(SiteConfig::default())
        .build();
    assert!(!controller.init().is_empty());
    assert!(controller.init().is_empty());
}

#[test]
fn empty_page_is_inert() {
    let mut f = SiteFixture::builder()
        .markup(pagectl_runtime::Markup::default())
        .build();
    for event in [
        PageEvent::MenuButtonClicked,
        PageEvent::FilterClicked { index: 0 },
        PageEvent::FaqToggled {
            index: 0,
            open: true,
        },
        PageEvent::AnchorClicked {
            index: 0,
            target_top: 0.0,
            scroll_y: 0.0,
            header_height: 0.0,
        },
    ] {
        let out = f.dispatch(event);
        assert!(out.patch.is_empty());
    }
    assert!(!f.controller().menu_open());
    assert_eq!(f.controller().pending_timers(), 0);
}
