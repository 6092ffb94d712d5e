#![forbid(unsafe_code)]

//! wasm-bindgen entry point.
//!
//! ```js
//! import init, { startPageController } from "./pagectl_web.js";
//! await init();
//! const page = startPageController({ reducedMotion: false });
//! ```

mod capability;
mod host;
mod listen;
mod render;
mod scan;

use std::rc::{Rc, Weak};

use js_sys::Reflect;
use pagectl_core::{NodeRef, ObserverKind};
use pagectl_runtime::{PageEvent, SiteController};
use tracing::{info, warn};
use wasm_bindgen::prelude::*;

use crate::error::WebBindError;
use crate::options::InitOptions;
use capability::{
    FbqPixel, GtagAnalytics, IntersectionSink, MediaMotion, ServiceWorkerOffline, WebObserver,
};
use host::Host;
use scan::{NodeRegistry, Scan};

/// Handle to a running page controller.
///
/// The controller lives as long as the page. Freeing the handle on the JS
/// side, or letting it be collected, only ends access to these accessors;
/// listeners and timers keep running.
#[wasm_bindgen]
pub struct PageController {
    host: Rc<Host>,
}

#[wasm_bindgen]
impl PageController {
    /// Whether the mobile menu is open.
    #[wasm_bindgen(js_name = menuOpen)]
    pub fn menu_open(&self) -> bool {
        self.host
            .controller
            .try_borrow()
            .is_ok_and(|c| c.menu_open())
    }

    /// Filter value of the active gallery button.
    #[wasm_bindgen(js_name = activeFilter)]
    pub fn active_filter(&self) -> String {
        self.host
            .controller
            .try_borrow()
            .map(|c| c.active_filter().to_owned())
            .unwrap_or_default()
    }

    /// Number of scheduled controller timers.
    #[wasm_bindgen(js_name = pendingTimers)]
    pub fn pending_timers(&self) -> u32 {
        self.host
            .controller
            .try_borrow()
            .map_or(0, |c| c.pending_timers() as u32)
    }

    /// Number of elements the scan found and the controller may drive.
    #[wasm_bindgen(js_name = trackedElements)]
    pub fn tracked_elements(&self) -> u32 {
        self.host.registry.len() as u32
    }
}

/// Scan the document, bind listeners and run the controller.
///
/// `options` is an optional plain object; see [`InitOptions`]. Fails without
/// touching the page when a browser global is missing or the options are
/// invalid.
#[wasm_bindgen(js_name = startPageController)]
pub fn start_page_controller(options: Option<JsValue>) -> Result<PageController, JsValue> {
    bind(options.as_ref()).map_err(|err| {
        warn!(target: "pagectl.web", error = %err, "page controller not started");
        JsValue::from_str(&err.to_string())
    })
}

fn bind(options: Option<&JsValue>) -> Result<PageController, WebBindError> {
    let options = InitOptions::from_json(&options_json(options)?)?;
    let window = web_sys::window().ok_or(WebBindError::MissingGlobal("window"))?;
    let document = window
        .document()
        .ok_or(WebBindError::MissingGlobal("document"))?;
    if document.body().is_none() {
        return Err(WebBindError::MissingGlobal("document.body"));
    }

    let mut registry = NodeRegistry::default();
    let Scan { markup, plan } = scan::scan(&document, &mut registry);
    let registry = Rc::new(registry);
    let has_observer = Reflect::has(window.as_ref(), &JsValue::from_str("IntersectionObserver"))
        .unwrap_or(false);

    let host = Rc::new_cyclic(|weak: &Weak<Host>| {
        let mut builder = SiteController::builder(markup)
            .config(options.config)
            .analytics(GtagAnalytics::new(window.clone()))
            .pixel(FbqPixel::new(window.clone()))
            .offline(ServiceWorkerOffline::new(window.clone()))
            .motion(MediaMotion::new(window.clone(), options.reduced_motion));
        if has_observer {
            builder = builder.observer(WebObserver::new(
                Rc::clone(&registry),
                intersection_sink(weak.clone()),
            ));
        }
        Host::new(window, document, registry, builder.build(), weak)
    });

    host.start();
    listen::attach(&host, &plan).map_err(js_error)?;
    // Listeners, timers and the observer sink only hold weak references.
    std::mem::forget(Rc::clone(&host));
    info!(
        target: "pagectl.web",
        elements = host.registry.len(),
        observer = has_observer,
        "page controller bound"
    );
    Ok(PageController { host })
}

fn intersection_sink(weak: Weak<Host>) -> IntersectionSink {
    Rc::new(move |kind: ObserverKind, node: NodeRef, is_intersecting: bool| {
        if let Some(host) = weak.upgrade() {
            host.dispatch(PageEvent::Intersection {
                kind,
                node,
                is_intersecting,
            });
        }
    })
}

fn options_json(options: Option<&JsValue>) -> Result<String, WebBindError> {
    let Some(options) = options.filter(|v| !v.is_null() && !v.is_undefined()) else {
        return Ok(String::new());
    };
    js_sys::JSON::stringify(options)
        .map(String::from)
        .map_err(js_error)
}

fn js_error(value: JsValue) -> WebBindError {
    WebBindError::Js(
        value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}")),
    )
}
