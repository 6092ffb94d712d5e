#![forbid(unsafe_code)]

//! The host loop: owns the controller, feeds it browser time, applies its
//! patches and keeps one timeout and one animation frame scheduled.
//!
//! # Invariants
//!
//! 1. The controller is never borrowed while a patch is applied. Applying
//!    focus can fire `blur` synchronously; that nested event dispatches
//!    normally.
//! 2. At most one `setTimeout` is outstanding, armed for
//!    [`SiteController::next_deadline`].
//! 3. At most one `requestAnimationFrame` is outstanding.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use pagectl_core::NodeRef;
use pagectl_runtime::{PageEvent, SiteController};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window};
use web_time::Instant;

use super::render::Renderer;
use super::scan::NodeRegistry;

struct PendingWake {
    handle: i32,
    at: Duration,
}

pub(crate) struct Host {
    pub(crate) window: Window,
    pub(crate) document: Document,
    pub(crate) registry: Rc<NodeRegistry>,
    pub(crate) controller: RefCell<SiteController>,
    render: Renderer,
    origin: Instant,
    wake: Closure<dyn Fn()>,
    pending_wake: RefCell<Option<PendingWake>>,
    frame: Closure<dyn Fn()>,
    frame_pending: Cell<bool>,
}

impl Host {
    pub(crate) fn new(
        window: Window,
        document: Document,
        registry: Rc<NodeRegistry>,
        controller: SiteController,
        weak: &Weak<Host>,
    ) -> Self {
        let wake = {
            let weak = weak.clone();
            Closure::<dyn Fn()>::new(move || {
                if let Some(host) = weak.upgrade() {
                    host.on_wake();
                }
            })
        };
        let frame = {
            let weak = weak.clone();
            Closure::<dyn Fn()>::new(move || {
                if let Some(host) = weak.upgrade() {
                    host.on_frame();
                }
            })
        };
        Self {
            render: Renderer::new(window.clone(), document.clone(), Rc::clone(&registry)),
            window,
            document,
            registry,
            controller: RefCell::new(controller),
            origin: Instant::now(),
            wake,
            pending_wake: RefCell::new(None),
            frame,
            frame_pending: Cell::new(false),
        }
    }

    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Apply the initial patch and arm timers.
    pub(crate) fn start(&self) {
        let patch = match self.controller.try_borrow_mut() {
            Ok(mut controller) => controller.init(),
            Err(_) => return,
        };
        self.render.apply(&patch);
        self.reschedule();
    }

    /// Route one event. Returns whether the listener must call
    /// `preventDefault()`.
    pub(crate) fn dispatch(&self, event: PageEvent) -> bool {
        let outcome = {
            let Ok(mut controller) = self.controller.try_borrow_mut() else {
                debug!(target: "pagectl.web", event = event.name(), "re-entrant event dropped");
                return false;
            };
            controller.dispatch(self.now(), event)
        };
        self.render.apply(&outcome.patch);
        if outcome.request_frame {
            self.request_frame();
        }
        self.reschedule();
        outcome.prevent_default
    }

    fn on_wake(&self) {
        self.pending_wake.borrow_mut().take();
        let patch = match self.controller.try_borrow_mut() {
            Ok(mut controller) => controller.advance(self.now()),
            Err(_) => return,
        };
        self.render.apply(&patch);
        self.reschedule();
    }

    fn on_frame(&self) {
        self.frame_pending.set(false);
        self.dispatch(PageEvent::AnimationFrame);
    }

    fn request_frame(&self) {
        if self.frame_pending.replace(true) {
            return;
        }
        if let Err(err) = self
            .window
            .request_animation_frame(self.frame.as_ref().unchecked_ref())
        {
            self.frame_pending.set(false);
            warn!(target: "pagectl.web", error = ?err, "requestAnimationFrame failed");
        }
    }

    fn reschedule(&self) {
        let Ok(next) = self.controller.try_borrow().map(|c| c.next_deadline()) else {
            return;
        };
        let mut pending = self.pending_wake.borrow_mut();
        if let Some(wake) = pending.as_ref()
            && Some(wake.at) == next
        {
            return;
        }
        if let Some(wake) = pending.take() {
            self.window.clear_timeout_with_handle(wake.handle);
        }
        let Some(at) = next else {
            return;
        };
        let delay = at.saturating_sub(self.now());
        let ms = i32::try_from(delay.as_micros().div_ceil(1_000)).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                self.wake.as_ref().unchecked_ref(),
                ms,
            ) {
            Ok(handle) => *pending = Some(PendingWake { handle, at }),
            Err(err) => warn!(target: "pagectl.web", error = ?err, "setTimeout failed"),
        }
    }

    #[must_use]
    pub(crate) fn element(&self, node: NodeRef) -> Option<&Element> {
        self.registry.get(node)
    }

    pub(crate) fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    pub(crate) fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    pub(crate) fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    /// Rendered height of `node`, or 0 when absent.
    pub(crate) fn height_of(&self, node: Option<NodeRef>) -> f64 {
        node.and_then(|n| self.element(n))
            .and_then(|e| e.dyn_ref::<HtmlElement>())
            .map_or(0.0, |e| f64::from(e.offset_height()))
    }

    /// Viewport-relative top edge of `node`, or 0 when absent.
    pub(crate) fn top_of(&self, node: Option<NodeRef>) -> f64 {
        node.and_then(|n| self.element(n))
            .map_or(0.0, |e| e.get_bounding_client_rect().top())
    }
}
