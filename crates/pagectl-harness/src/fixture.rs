#![forbid(unsafe_code)]

//! A canonical page wired to a controller, a headless document and a virtual
//! clock.
//!
//! The fixture plays the host: it applies every patch, runs requested frames
//! on demand, and wakes the controller exactly at its deadlines when time is
//! advanced, so tests never sleep.

use std::time::Duration;

use pagectl_core::{Clock, DeterministicClock, NodeRef, ObserverKind, SiteConfig};
use pagectl_runtime::{
    AnchorMarkup, DropdownMarkup, FaqMarkup, FieldId, FieldMarkup, FilterButtonMarkup, FormData,
    FormMarkup, GalleryItemMarkup, Key, LazyImageMarkup, Markup, MenuMarkup, Outcome, PageEvent,
    SiteController,
};

use crate::document::HeadlessDocument;
use crate::fakes::{
    MotionToggle, RecordingAnalytics, RecordingObserver, RecordingOffline, RecordingPixel,
    RecordingSink,
};
use crate::transcript::Transcript;

/// Node handles of the canonical page.
pub mod nodes {
    use pagectl_core::NodeRef;

    pub const MENU_BUTTON: NodeRef = NodeRef(1);
    pub const NAV_PANEL: NodeRef = NodeRef(2);
    /// Focusable links inside the panel, in document order.
    pub const NAV_LINKS: [NodeRef; 3] = [NodeRef(3), NodeRef(4), NodeRef(5)];

    pub const DROPDOWN_TOGGLES: [NodeRef; 2] = [NodeRef(10), NodeRef(12)];
    pub const DROPDOWNS: [NodeRef; 2] = [NodeRef(11), NodeRef(13)];

    pub const STICKY_CTA: NodeRef = NodeRef(20);
    pub const HEADER: NodeRef = NodeRef(21);

    pub const FORM: NodeRef = NodeRef(30);
    pub const SUBMIT: NodeRef = NodeRef(31);
    /// Inputs in `FieldId::ALL` order.
    pub const FIELDS: [NodeRef; 5] = [NodeRef(32), NodeRef(33), NodeRef(34), NodeRef(35), NodeRef(36)];
    /// Error text slots in `FieldId::ALL` order.
    pub const ERRORS: [NodeRef; 5] = [NodeRef(42), NodeRef(43), NodeRef(44), NodeRef(45), NodeRef(46)];
    pub const PHONE: NodeRef = FIELDS[3];

    pub const LAZY_IMAGES: [NodeRef; 3] = [NodeRef(50), NodeRef(51), NodeRef(52)];
    pub const REVEAL_CARDS: [NodeRef; 3] = [NodeRef(60), NodeRef(61), NodeRef(62)];

    pub const FAQ_DETAILS: [NodeRef; 2] = [NodeRef(70), NodeRef(72)];
    pub const FAQ_SUMMARIES: [NodeRef; 2] = [NodeRef(71), NodeRef(73)];

    /// Filter controls: "all", "plumbing", "electrical".
    pub const FILTER_BUTTONS: [NodeRef; 3] = [NodeRef(80), NodeRef(81), NodeRef(82)];
    /// Gallery items with categories plumbing, electrical, plumbing.
    pub const GALLERY_ITEMS: [NodeRef; 3] = [NodeRef(90), NodeRef(91), NodeRef(92)];

    /// Anchors: `#`, `#contact` (exists), `#missing`.
    pub const ANCHORS: [NodeRef; 3] = [NodeRef(100), NodeRef(101), NodeRef(103)];
    pub const CONTACT_SECTION: NodeRef = NodeRef(102);

    pub const TEL_LINK: NodeRef = NodeRef(110);
}

/// Filter values of [`nodes::FILTER_BUTTONS`].
pub const FILTERS: [&str; 3] = ["all", "plumbing", "electrical"];
/// Categories of [`nodes::GALLERY_ITEMS`].
pub const CATEGORIES: [&str; 3] = ["plumbing", "electrical", "plumbing"];

/// Viewport the fixture reports by default.
pub const NARROW_WIDTH: f64 = 375.0;
pub const WIDE_WIDTH: f64 = 1280.0;
pub const VIEWPORT_HEIGHT: f64 = 800.0;
pub const HEADER_HEIGHT: f64 = 80.0;

/// Input node of `field`.
#[must_use]
pub fn input_of(field: FieldId) -> NodeRef {
    let index = FieldId::ALL
        .iter()
        .position(|f| *f == field)
        .unwrap_or_default();
    nodes::FIELDS[index]
}

/// Error slot of `field`.
#[must_use]
pub fn error_slot_of(field: FieldId) -> NodeRef {
    let index = FieldId::ALL
        .iter()
        .position(|f| *f == field)
        .unwrap_or_default();
    nodes::ERRORS[index]
}

/// A value that passes validation for `field`.
#[must_use]
pub fn valid_value(field: FieldId) -> &'static str {
    match field {
        FieldId::FirstName => "Jo",
        FieldId::LastName => "Hudson",
        FieldId::Email => "jo@example.com",
        FieldId::Phone => "(727) 998-4211",
        FieldId::Address => "12 Harbor Lane",
    }
}

/// The markup every fixture page carries.
#[must_use]
pub fn canonical_markup() -> Markup {
    use nodes::*;
    Markup {
        menu: Some(MenuMarkup {
            button: MENU_BUTTON,
            panel: NAV_PANEL,
            focusables: NAV_LINKS.to_vec(),
        }),
        dropdowns: DROPDOWN_TOGGLES
            .iter()
            .zip(DROPDOWNS)
            .map(|(&toggle, container)| DropdownMarkup { toggle, container })
            .collect(),
        sticky_cta: Some(STICKY_CTA),
        header: Some(HEADER),
        contact_form: Some(FormMarkup {
            form: FORM,
            submit: SUBMIT,
            fields: FieldId::ALL
                .into_iter()
                .map(|id| FieldMarkup {
                    id,
                    input: input_of(id),
                    error_slot: Some(error_slot_of(id)),
                })
                .collect(),
        }),
        phone_input: Some(PHONE),
        lazy_images: LAZY_IMAGES
            .iter()
            .enumerate()
            .map(|(i, &node)| LazyImageMarkup {
                node,
                data_src: Some(format!("/img/job-{i}.jpg")),
                data_srcset: (i == 0).then(|| "/img/job-0@2x.jpg 2x".to_owned()),
            })
            .collect(),
        reveal_targets: REVEAL_CARDS.to_vec(),
        faq_items: FAQ_DETAILS
            .iter()
            .zip(FAQ_SUMMARIES)
            .map(|(&details, summary)| FaqMarkup {
                details,
                summary: Some(summary),
            })
            .collect(),
        filter_buttons: FILTER_BUTTONS
            .iter()
            .zip(FILTERS)
            .enumerate()
            .map(|(i, (&node, filter))| FilterButtonMarkup {
                node,
                filter: filter.to_owned(),
                initially_active: i == 0,
            })
            .collect(),
        gallery_items: GALLERY_ITEMS
            .iter()
            .zip(CATEGORIES)
            .map(|(&node, category)| GalleryItemMarkup {
                node,
                category: category.to_owned(),
            })
            .collect(),
        anchors: vec![
            AnchorMarkup {
                link: ANCHORS[0],
                href: "#".into(),
                target: None,
            },
            AnchorMarkup {
                link: ANCHORS[1],
                href: "#contact".into(),
                target: Some(CONTACT_SECTION),
            },
            AnchorMarkup {
                link: ANCHORS[2],
                href: "#missing".into(),
                target: None,
            },
        ],
        tel_links: vec![TEL_LINK],
    }
}

/// Builder for [`SiteFixture`].
#[derive(Debug, Clone)]
pub struct SiteFixtureBuilder {
    markup: Markup,
    config: SiteConfig,
    observer: bool,
    reduced_motion: bool,
    offline: RecordingOffline,
}

impl SiteFixtureBuilder {
    #[must_use]
    pub fn markup(mut self, markup: Markup) -> Self {
        self.markup = markup;
        self
    }

    #[must_use]
    pub fn config(mut self, config: SiteConfig) -> Self {
        self.config = config;
        self
    }

    /// Simulate an environment without the viewport observation primitive.
    #[must_use]
    pub fn without_observer(mut self) -> Self {
        self.observer = false;
        self
    }

    #[must_use]
    pub fn reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    #[must_use]
    pub fn offline(mut self, offline: RecordingOffline) -> Self {
        self.offline = offline;
        self
    }

    /// Build the controller and apply its initial patch.
    #[must_use]
    pub fn build(self) -> SiteFixture {
        let analytics = RecordingAnalytics::new();
        let pixel = RecordingPixel::new();
        let observer = self.observer.then(RecordingObserver::new);
        let motion = MotionToggle::new(self.reduced_motion);
        let sink = RecordingSink::new();

        let mut builder = SiteController::builder(self.markup)
            .config(self.config)
            .analytics(analytics.clone())
            .pixel(pixel.clone())
            .offline(self.offline.clone())
            .motion(motion.clone())
            .submission_sink(sink.clone());
        if let Some(observer) = &observer {
            builder = builder.observer(observer.clone());
        }

        let mut doc = HeadlessDocument::new();
        doc.author_form(nodes::FORM, nodes::FIELDS);
        doc.author_class(nodes::FILTER_BUTTONS[0], "active");

        let mut fixture = SiteFixture {
            controller: builder.build(),
            doc,
            clock: DeterministicClock::new(),
            transcript: Transcript::new(),
            frame_requested: false,
            analytics,
            pixel,
            observer,
            offline: self.offline,
            motion,
            sink,
        };
        let patch = fixture.controller.init();
        fixture.doc.apply(&patch);
        let checksum = fixture.doc.checksum();
        fixture
            .transcript
            .record_init(fixture.clock.now(), patch.len(), checksum);
        fixture
    }
}

/// Host simulator around one [`SiteController`].
pub struct SiteFixture {
    controller: SiteController,
    doc: HeadlessDocument,
    clock: DeterministicClock,
    transcript: Transcript,
    frame_requested: bool,
    pub analytics: RecordingAnalytics,
    pub pixel: RecordingPixel,
    /// `None` when built [`SiteFixtureBuilder::without_observer`].
    pub observer: Option<RecordingObserver>,
    pub offline: RecordingOffline,
    pub motion: MotionToggle,
    pub sink: RecordingSink,
}

impl SiteFixture {
    /// Canonical page, observer present, animations allowed.
    #[must_use]
    pub fn builder() -> SiteFixtureBuilder {
        SiteFixtureBuilder {
            markup: canonical_markup(),
            config: SiteConfig::default(),
            observer: true,
            reduced_motion: false,
            offline: RecordingOffline::accepting(),
        }
    }

    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    #[must_use]
    pub fn controller(&self) -> &SiteController {
        &self.controller
    }

    #[must_use]
    pub fn doc(&self) -> &HeadlessDocument {
        &self.doc
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Whether a scroll asked for a frame that has not run yet.
    #[must_use]
    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    // --- Host loop ----------------------------------------------------------

    /// Dispatch `event` at the current virtual time and apply the result.
    pub fn dispatch(&mut self, event: PageEvent) -> Outcome {
        let now = self.clock.now();
        let name = event.name();
        let outcome = self.controller.dispatch(now, event);
        self.doc.apply(&outcome.patch);
        self.frame_requested |= outcome.request_frame;
        let checksum = self.doc.checksum();
        self.transcript.record_dispatch(
            now,
            name,
            outcome.patch.len(),
            outcome.prevent_default,
            checksum,
        );
        outcome
    }

    /// Move virtual time forward by `ms`, waking the controller at every
    /// deadline on the way.
    pub fn advance_ms(&mut self, ms: u64) {
        let target = self.clock.now() + Duration::from_millis(ms);
        let mut wakes = 0_u32;
        while let Some(deadline) = self.controller.next_deadline() {
            if deadline > target {
                break;
            }
            let at = deadline.max(self.clock.now());
            self.clock.set(at);
            let patch = self.controller.advance(at);
            self.doc.apply(&patch);
            let checksum = self.doc.checksum();
            self.transcript.record_advance(at, patch.len(), checksum);
            wakes += 1;
        }
        self.clock.set(target);
        tracing::trace!(
            target: "pagectl.harness",
            now_ms = target.as_millis() as u64,
            wakes,
            "virtual clock advanced"
        );
    }

    /// Run the pending animation frame, if one was requested.
    pub fn run_frame(&mut self) -> bool {
        if !std::mem::take(&mut self.frame_requested) {
            return false;
        }
        self.dispatch(PageEvent::AnimationFrame);
        true
    }

    // --- User actions -------------------------------------------------------

    /// Move focus the way the user would (no event is dispatched).
    pub fn focus(&mut self, node: NodeRef) {
        self.doc.set_focus(Some(node));
    }

    pub fn click_menu(&mut self) -> Outcome {
        self.dispatch(PageEvent::MenuButtonClicked)
    }

    /// Stop rendering `node`, the way a collapsed submenu hides its links.
    pub fn hide(&mut self, node: NodeRef) {
        self.doc.author_attr(node, "hidden", "");
    }

    /// Press `key` with focus wherever the document currently has it.
    pub fn press(&mut self, key: Key) -> Outcome {
        let focused = self.doc.focused();
        let hidden = self.doc.hidden_nodes();
        self.dispatch(PageEvent::KeyDown {
            key,
            focused,
            hidden,
        })
    }

    pub fn click_outside(&mut self) -> Outcome {
        self.dispatch(PageEvent::DocumentClicked { inside_menu: false })
    }

    pub fn click_dropdown(&mut self, index: usize, viewport_width: f64) -> Outcome {
        self.dispatch(PageEvent::DropdownToggleClicked {
            index,
            viewport_width,
        })
    }

    /// Scroll to `scroll_y` and let the requested frame run.
    pub fn scroll_to(&mut self, scroll_y: f64) {
        self.dispatch(PageEvent::Scrolled {
            scroll_y,
            viewport_height: VIEWPORT_HEIGHT,
        });
        self.run_frame();
    }

    /// Activate anchor `index`; the contact section sits `target_top` below
    /// the viewport top.
    pub fn click_anchor(&mut self, index: usize, target_top: f64) -> Outcome {
        let scroll_y = self.doc.scroll_y();
        self.dispatch(PageEvent::AnchorClicked {
            index,
            target_top,
            scroll_y,
            header_height: HEADER_HEIGHT,
        })
    }

    /// Type `value` into `node` (replacing its content) and report the input.
    pub fn type_into(&mut self, node: NodeRef, value: &str) -> Outcome {
        self.doc.type_value(node, value);
        self.doc.set_focus(Some(node));
        self.dispatch(PageEvent::FieldInput {
            node,
            value: value.to_owned(),
        })
    }

    /// Move focus away from `node`.
    pub fn blur(&mut self, node: NodeRef) -> Outcome {
        let value = self.doc.value(node).to_owned();
        self.dispatch(PageEvent::FieldBlurred { node, value })
    }

    /// Type a valid value into every validated field.
    pub fn fill_valid_form(&mut self) {
        for field in FieldId::ALL {
            self.type_into(input_of(field), valid_value(field));
        }
    }

    /// Form data as the browser would collect it from the document.
    #[must_use]
    pub fn form_data(&self) -> FormData {
        FieldId::ALL
            .into_iter()
            .fold(FormData::new(), |data, field| {
                data.with(field.name(), self.doc.value(input_of(field)))
            })
            .with("services", "pressure-washing")
            .with("services", "gutter-cleaning")
    }

    pub fn submit(&mut self) -> Outcome {
        let data = self.form_data();
        self.dispatch(PageEvent::FormSubmitted { data })
    }

    pub fn intersect(&mut self, kind: ObserverKind, node: NodeRef, is_intersecting: bool) -> Outcome {
        self.dispatch(PageEvent::Intersection {
            kind,
            node,
            is_intersecting,
        })
    }

    pub fn click_filter(&mut self, index: usize) -> Outcome {
        self.dispatch(PageEvent::FilterClicked { index })
    }
}

impl Default for SiteFixture {
    fn default() -> Self {
        Self::new()
    }
}
