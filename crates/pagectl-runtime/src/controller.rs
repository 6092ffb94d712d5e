#![forbid(unsafe_code)]

//! The page controller: owns every component, routes host events, and fires
//! timers.
//!
//! # How it works
//!
//! 1. The host scans the page into a [`Markup`] and builds a controller with
//!    whatever collaborators it has ([`SiteController::builder`]).
//! 2. [`SiteController::init`] returns the initial patch (authored state,
//!    lazy loading fallbacks, reveal offsets) and registers observations.
//! 3. Each browser event becomes a [`PageEvent`] passed to
//!    [`SiteController::dispatch`] together with the current monotonic time.
//!    Timers that fell due before `now` fire first, so effects stay in time
//!    order.
//! 4. The host wakes the controller at [`SiteController::next_deadline`] via
//!    [`SiteController::advance`].
//!
//! Components never call each other. The only shared state is the menu's
//! open flag, which anchor navigation may close.

use std::time::Duration;

use pagectl_core::{
    Analytics, ConversionPixel, FixedMotion, MotionPreference, NoAnalytics, NoOfflineSupport,
    NoPixel, NodeRef, ObserverKind, OfflineSupport, Patch, SiteConfig, TimerQueue, TransitionMode,
    ViewportObserver,
};

use crate::anchor::AnchorNav;
use crate::event::{Outcome, PageEvent};
use crate::faq::FaqList;
use crate::filter::FilterView;
use crate::form::{
    ContactForm, FieldId, FormData, SimulatedSubmission, SubmissionOutcome, SubmissionPhase,
    SubmissionSink, format_phone,
};
use crate::markup::Markup;
use crate::nav::{CloseReason, Navigation};
use crate::scroll::{ScrollSample, ScrollVisibility};
use crate::tracking;
use crate::turn::{TimerKey, Turn};
use crate::viewport::{LazyImages, Reveal};

/// Builder for [`SiteController`].
pub struct SiteControllerBuilder {
    markup: Markup,
    config: SiteConfig,
    analytics: Box<dyn Analytics>,
    pixel: Box<dyn ConversionPixel>,
    offline: Box<dyn OfflineSupport>,
    observer: Option<Box<dyn ViewportObserver>>,
    motion: Box<dyn MotionPreference>,
    sink: Box<dyn SubmissionSink>,
}

impl SiteControllerBuilder {
    #[must_use]
    pub fn config(mut self, config: SiteConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn analytics(mut self, analytics: impl Analytics + 'static) -> Self {
        self.analytics = Box::new(analytics);
        self
    }

    #[must_use]
    pub fn pixel(mut self, pixel: impl ConversionPixel + 'static) -> Self {
        self.pixel = Box::new(pixel);
        self
    }

    #[must_use]
    pub fn offline(mut self, offline: impl OfflineSupport + 'static) -> Self {
        self.offline = Box::new(offline);
        self
    }

    /// Provide the viewport observation primitive. Without one, lazy images
    /// load immediately and entrance animations are skipped.
    #[must_use]
    pub fn observer(mut self, observer: impl ViewportObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    #[must_use]
    pub fn motion(mut self, motion: impl MotionPreference + 'static) -> Self {
        self.motion = Box::new(motion);
        self
    }

    #[must_use]
    pub fn submission_sink(mut self, sink: impl SubmissionSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    #[must_use]
    pub fn build(self) -> SiteController {
        let Markup {
            menu,
            dropdowns,
            sticky_cta,
            header,
            contact_form,
            phone_input,
            lazy_images,
            reveal_targets,
            faq_items,
            filter_buttons,
            gallery_items,
            anchors,
            tel_links: _,
        } = self.markup;
        let config = self.config;
        SiteController {
            nav: Navigation::new(menu, dropdowns, config.nav.clone()),
            scroll: ScrollVisibility::new(sticky_cta, header, config.scroll.clone()),
            lazy: LazyImages::new(lazy_images),
            reveal: Reveal::new(reveal_targets),
            form: contact_form.map(|m| ContactForm::new(m, config.form.clone())),
            phone_input,
            faq: FaqList::new(faq_items),
            filter: FilterView::new(filter_buttons, gallery_items, config.filter.clone()),
            anchors: AnchorNav::new(anchors, config.anchor.clone()),
            timers: TimerQueue::new(),
            analytics: self.analytics,
            pixel: self.pixel,
            offline: self.offline,
            observer: self.observer,
            motion: self.motion,
            sink: self.sink,
            config,
            initialized: false,
            offline_attempted: false,
        }
    }
}

/// Interaction controller for one page.
pub struct SiteController {
    config: SiteConfig,
    nav: Navigation,
    scroll: ScrollVisibility,
    lazy: LazyImages,
    reveal: Reveal,
    form: Option<ContactForm>,
    phone_input: Option<NodeRef>,
    faq: FaqList,
    filter: FilterView,
    anchors: AnchorNav,
    timers: TimerQueue<TimerKey>,
    analytics: Box<dyn Analytics>,
    pixel: Box<dyn ConversionPixel>,
    offline: Box<dyn OfflineSupport>,
    observer: Option<Box<dyn ViewportObserver>>,
    motion: Box<dyn MotionPreference>,
    sink: Box<dyn SubmissionSink>,
    initialized: bool,
    offline_attempted: bool,
}

impl std::fmt::Debug for SiteController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteController")
            .field("menu_open", &self.nav.is_open())
            .field("expanded_dropdown", &self.nav.expanded_dropdown())
            .field("submission", &self.submission_phase())
            .field("active_filter", &self.filter.active_filter())
            .field("pending_timers", &self.timers.len())
            .field("observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl SiteController {
    /// Start building a controller for `markup` with no-op collaborators,
    /// animations allowed, and the simulated submission sink.
    #[must_use]
    pub fn builder(markup: Markup) -> SiteControllerBuilder {
        SiteControllerBuilder {
            markup,
            config: SiteConfig::default(),
            analytics: Box::new(NoAnalytics),
            pixel: Box::new(NoPixel),
            offline: Box::new(NoOfflineSupport),
            observer: None,
            motion: Box::new(FixedMotion::ANIMATED),
            sink: Box::new(SimulatedSubmission),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    fn mode(&self) -> TransitionMode {
        self.motion.transition_mode()
    }

    /// Apply authored state and begin observation. Runs once; later calls
    /// return an empty patch.
    pub fn init(&mut self) -> Patch {
        let mut patch = Patch::new();
        if self.initialized {
            return patch;
        }
        self.initialized = true;

        let observer = self.observer.as_deref();
        self.lazy.start(observer, &self.config.viewport, &mut patch);
        let mode = self.motion.transition_mode();
        self.reveal
            .start(observer, mode, &self.config.viewport, &mut patch);
        self.filter.init(mode, &mut patch);

        tracing::info!(
            target: "pagectl",
            menu = self.nav.has_menu(),
            dropdowns = self.nav.dropdown_count(),
            form = self.form.is_some(),
            lazy_observing = self.lazy.tracker().observing(),
            reveal = self.reveal.is_active(),
            gallery = self.filter.is_enabled(),
            "page controller initialized"
        );
        patch
    }

    /// Earliest pending timer deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Fire every timer due at or before `now`.
    pub fn advance(&mut self, now: Duration) -> Patch {
        let mut patch = Patch::new();
        self.fire_due(now, &mut patch);
        patch
    }

    fn fire_due(&mut self, now: Duration, patch: &mut Patch) {
        while let Some(key) = self.timers.pop_due(now) {
            tracing::trace!(target: "pagectl.timer", ?key, "timer fired");
            match key {
                TimerKey::HeaderElevation => {
                    let mut turn = Turn::new(now, patch, &mut self.timers);
                    self.scroll.on_header_timer(&mut turn);
                }
                TimerKey::SubmissionSettle => {
                    if let Some(form) = &mut self.form {
                        form.settle(self.sink.as_ref(), self.analytics.as_ref(), patch);
                    }
                }
                TimerKey::GalleryItem(index) => self.filter.on_item_timer(index, patch),
                TimerKey::Announcement(id) => self.filter.on_announcement_expired(id, patch),
            }
        }
    }

    /// Handle one host event at monotonic time `now`.
    pub fn dispatch(&mut self, now: Duration, event: PageEvent) -> Outcome {
        let _span = tracing::debug_span!("page.dispatch", event = event.name()).entered();
        let mut out = Outcome::default();
        self.fire_due(now, &mut out.patch);

        match event {
            PageEvent::Loaded { secure_context } => self.register_offline(secure_context),
            PageEvent::MenuButtonClicked => self.nav.toggle(&mut out.patch),
            PageEvent::NavLinkClicked { viewport_width } => {
                self.nav.on_nav_link(viewport_width, &mut out.patch);
            }
            PageEvent::DocumentClicked { inside_menu } => {
                self.nav.on_document_click(inside_menu, &mut out.patch);
            }
            PageEvent::KeyDown {
                key,
                focused,
                hidden,
            } => {
                out.prevent_default = self.nav.on_key(key, focused, &hidden, &mut out.patch);
            }
            PageEvent::DropdownToggleClicked {
                index,
                viewport_width,
            } => {
                out.prevent_default =
                    self.nav
                        .toggle_dropdown(index, viewport_width, &mut out.patch);
            }
            PageEvent::Scrolled {
                scroll_y,
                viewport_height,
            } => {
                let sample = ScrollSample {
                    scroll_y,
                    viewport_height,
                };
                let mut turn = Turn::new(now, &mut out.patch, &mut self.timers);
                out.request_frame = self.scroll.on_scroll(sample, &mut turn);
            }
            PageEvent::AnimationFrame => {
                let mut turn = Turn::new(now, &mut out.patch, &mut self.timers);
                self.scroll.on_frame(&mut turn);
            }
            PageEvent::AnchorClicked {
                index,
                target_top,
                scroll_y,
                header_height,
            } => {
                if let Some(jump) = self
                    .anchors
                    .resolve(index, target_top, scroll_y, header_height)
                {
                    out.prevent_default = true;
                    self.nav.close(CloseReason::AnchorNavigation, &mut out.patch);
                    AnchorNav::render(jump, self.mode(), &mut out.patch);
                }
            }
            PageEvent::FieldBlurred { node, value } => {
                if let Some(form) = &mut self.form {
                    form.on_blur(node, &value, &mut out.patch);
                }
            }
            PageEvent::FieldInput { node, value } => {
                let value = if self.phone_input == Some(node) {
                    let formatted = format_phone(&value);
                    if formatted != value {
                        out.patch.set_value(node, formatted.clone());
                    }
                    formatted
                } else {
                    value
                };
                if let Some(form) = &mut self.form {
                    form.on_input(node, &value, &mut out.patch);
                }
            }
            PageEvent::FormSubmitted { data } => {
                out.prevent_default = true;
                self.submit(now, &data, &mut out.patch);
            }
            PageEvent::Intersection {
                kind,
                node,
                is_intersecting,
            } => {
                let observer = self.observer.as_deref();
                match kind {
                    ObserverKind::LazyImage => {
                        self.lazy
                            .on_intersection(node, is_intersecting, observer, &mut out.patch);
                    }
                    ObserverKind::Reveal => {
                        self.reveal
                            .on_intersection(node, is_intersecting, observer, &mut out.patch);
                    }
                }
            }
            PageEvent::FaqToggled { index, open } => {
                self.faq.on_toggle(index, open, &mut out.patch);
            }
            PageEvent::TelLinkClicked => {
                tracking::report_phone_call(self.analytics.as_ref(), self.pixel.as_ref());
            }
            PageEvent::BeforePrint { title } => {
                tracking::report_print(self.analytics.as_ref(), &title);
            }
            PageEvent::FilterClicked { index } => {
                let mode = self.mode();
                let mut turn = Turn::new(now, &mut out.patch, &mut self.timers);
                self.filter.select(index, mode, &mut turn);
            }
        }
        out
    }

    fn submit(&mut self, now: Duration, data: &FormData, patch: &mut Patch) {
        let Some(form) = &mut self.form else {
            return;
        };
        let mut turn = Turn::new(now, patch, &mut self.timers);
        form.submit(data, &mut turn);
    }

    fn register_offline(&mut self, secure_context: bool) {
        if self.offline_attempted || !secure_context {
            return;
        }
        self.offline_attempted = true;
        match self.offline.register(&self.config.offline.worker_url) {
            Ok(()) => tracing::debug!(target: "pagectl.offline", "offline worker registered"),
            Err(err) => {
                tracing::debug!(target: "pagectl.offline", error = %err, "offline worker not registered");
            }
        }
    }

    // --- State inspection ---------------------------------------------------

    #[must_use]
    pub fn menu_open(&self) -> bool {
        self.nav.is_open()
    }

    #[must_use]
    pub fn expanded_dropdown(&self) -> Option<usize> {
        self.nav.expanded_dropdown()
    }

    #[must_use]
    pub fn cta_visible(&self) -> Option<bool> {
        self.scroll.cta_is_visible()
    }

    #[must_use]
    pub fn header_raised(&self) -> Option<bool> {
        self.scroll.header_is_raised()
    }

    /// `Idle` when the page has no contact form.
    #[must_use]
    pub fn submission_phase(&self) -> SubmissionPhase {
        self.form
            .as_ref()
            .map_or(SubmissionPhase::Idle, ContactForm::phase)
    }

    #[must_use]
    pub fn last_submission(&self) -> Option<&SubmissionOutcome> {
        self.form.as_ref().and_then(ContactForm::last_outcome)
    }

    #[must_use]
    pub fn field_value(&self, field: FieldId) -> Option<&str> {
        self.form.as_ref().and_then(|f| f.value(field))
    }

    #[must_use]
    pub fn field_valid(&self, field: FieldId) -> Option<bool> {
        self.form.as_ref().and_then(|f| f.is_valid(field))
    }

    #[must_use]
    pub fn active_filter(&self) -> &str {
        self.filter.active_filter()
    }

    #[must_use]
    pub fn visible_items(&self) -> usize {
        self.filter.visible_count()
    }

    #[must_use]
    pub fn images_loaded(&self) -> usize {
        self.lazy.tracker().fired_count()
    }

    /// Elements still registered with the observer, across both behaviors.
    #[must_use]
    pub fn active_observations(&self) -> usize {
        self.lazy.tracker().observing() + self.reveal.tracker().observing()
    }

    #[must_use]
    pub fn revealed(&self) -> usize {
        self.reveal.tracker().fired_count()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}
