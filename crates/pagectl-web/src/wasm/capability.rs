#![forbid(unsafe_code)]

//! Browser-backed collaborators.
//!
//! Third-party globals (`gtag`, `fbq`) are looked up on every call: tag
//! scripts load asynchronously and may appear after the controller starts.

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::rc::Rc;

use js_sys::{Array, Function, Reflect};
use pagectl_core::{
    Analytics, CapabilityError, ConversionPixel, EventProps, MotionPreference, NodeRef,
    ObserverKind, ObserverOptions, OfflineSupport, ViewportObserver,
};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window};

use super::scan::NodeRegistry;
use crate::selectors::REDUCED_MOTION_QUERY;

fn global_function(window: &Window, name: &str) -> Option<Function> {
    Reflect::get(window.as_ref(), &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

/// Reports events through the site's `gtag` snippet.
pub(crate) struct GtagAnalytics {
    window: Window,
}

impl GtagAnalytics {
    pub(crate) fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Analytics for GtagAnalytics {
    fn event(&self, event: &str, props: &EventProps) {
        let Some(gtag) = global_function(&self.window, "gtag") else {
            return;
        };
        let props = match serde_json::to_string(props)
            .ok()
            .and_then(|json| js_sys::JSON::parse(&json).ok())
        {
            Some(props) => props,
            None => return,
        };
        if let Err(err) = gtag.call3(
            &JsValue::NULL,
            &JsValue::from_str("event"),
            &JsValue::from_str(event),
            &props,
        ) {
            debug!(target: "pagectl.web", event, error = ?err, "gtag call threw");
        }
    }
}

/// Reports conversions through the site's `fbq` snippet.
pub(crate) struct FbqPixel {
    window: Window,
}

impl FbqPixel {
    pub(crate) fn new(window: Window) -> Self {
        Self { window }
    }
}

impl ConversionPixel for FbqPixel {
    fn track(&self, event: &str) {
        let Some(fbq) = global_function(&self.window, "fbq") else {
            return;
        };
        if let Err(err) = fbq.call2(
            &JsValue::NULL,
            &JsValue::from_str("track"),
            &JsValue::from_str(event),
        ) {
            debug!(target: "pagectl.web", event, error = ?err, "fbq call threw");
        }
    }
}

/// Registers the offline worker with `navigator.serviceWorker`.
///
/// Registration resolves asynchronously; a rejected promise is logged and
/// otherwise ignored.
pub(crate) struct ServiceWorkerOffline {
    window: Window,
}

impl ServiceWorkerOffline {
    pub(crate) fn new(window: Window) -> Self {
        Self { window }
    }
}

impl OfflineSupport for ServiceWorkerOffline {
    fn register(&self, script_url: &str) -> Result<(), CapabilityError> {
        let navigator = self.window.navigator();
        let supported = Reflect::has(navigator.as_ref(), &JsValue::from_str("serviceWorker"))
            .unwrap_or(false);
        if !supported {
            return Err(CapabilityError::Unavailable("serviceWorker"));
        }
        let promise = navigator.service_worker().register(script_url);
        let url = script_url.to_owned();
        wasm_bindgen_futures::spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => debug!(
                    target: "pagectl.offline",
                    %url,
                    "service worker registration resolved"
                ),
                Err(err) => debug!(
                    target: "pagectl.offline",
                    %url,
                    error = ?err,
                    "service worker registration rejected"
                ),
            }
        });
        Ok(())
    }
}

/// Reads `prefers-reduced-motion` on every query unless forced by init
/// options.
pub(crate) struct MediaMotion {
    window: Window,
    forced: Option<bool>,
}

impl MediaMotion {
    pub(crate) fn new(window: Window, forced: Option<bool>) -> Self {
        Self { window, forced }
    }
}

impl MotionPreference for MediaMotion {
    fn prefers_reduced_motion(&self) -> bool {
        if let Some(forced) = self.forced {
            return forced;
        }
        matches!(self.window.match_media(REDUCED_MOTION_QUERY), Ok(Some(list)) if list.matches())
    }
}

/// Receives `(kind, node, is_intersecting)` for every observed crossing.
pub(crate) type IntersectionSink = Rc<dyn Fn(ObserverKind, NodeRef, bool)>;

/// `IntersectionObserver`-backed viewport observation.
///
/// One browser observer per [`ObserverKind`], created on first use with the
/// options of that first observation.
pub(crate) struct WebObserver {
    registry: Rc<NodeRegistry>,
    sink: IntersectionSink,
    observers: RefCell<HashMap<ObserverKind, Observer>>,
}

struct Observer {
    inner: IntersectionObserver,
    _callback: Closure<dyn Fn(Array)>,
}

impl WebObserver {
    pub(crate) fn new(registry: Rc<NodeRegistry>, sink: IntersectionSink) -> Self {
        Self {
            registry,
            sink,
            observers: RefCell::new(HashMap::new()),
        }
    }

    fn create(&self, kind: ObserverKind, options: &ObserverOptions) -> Result<Observer, JsValue> {
        let registry = Rc::clone(&self.registry);
        let sink = Rc::clone(&self.sink);
        let callback = Closure::<dyn Fn(Array)>::new(move |entries: Array| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if let Some(node) = registry.find(&entry.target()) {
                    sink(kind, node, entry.is_intersecting());
                }
            }
        });
        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin);
        init.set_threshold(&JsValue::from_f64(options.threshold));
        let inner =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        Ok(Observer {
            inner,
            _callback: callback,
        })
    }
}

impl ViewportObserver for WebObserver {
    fn observe(&self, kind: ObserverKind, node: NodeRef, options: &ObserverOptions) {
        let Some(element) = self.registry.get(node) else {
            return;
        };
        let mut observers = self.observers.borrow_mut();
        let observer = match observers.entry(kind) {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => match self.create(kind, options) {
                Ok(observer) => slot.insert(observer),
                Err(err) => {
                    warn!(
                        target: "pagectl.web",
                        ?kind,
                        error = ?err,
                        "IntersectionObserver construction failed"
                    );
                    return;
                }
            },
        };
        observer.inner.observe(element);
    }

    fn unobserve(&self, kind: ObserverKind, node: NodeRef) {
        let Some(element) = self.registry.get(node) else {
            return;
        };
        if let Some(observer) = self.observers.borrow().get(&kind) {
            observer.inner.unobserve(element);
        }
    }
}
