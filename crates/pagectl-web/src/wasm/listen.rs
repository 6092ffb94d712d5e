#![forbid(unsafe_code)]

//! Browser event listeners. Each one translates a DOM event into a
//! [`PageEvent`] and honors the controller's `preventDefault` request.
//!
//! Listeners hold a weak reference to the [`Host`]; `bind` keeps the host
//! itself alive for the page's lifetime.

use std::rc::Rc;

use js_sys::Reflect;
use pagectl_core::NodeRef;
use pagectl_runtime::{FieldId, FormData, Key, PageEvent};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Event, EventTarget, HtmlDetailsElement, HtmlElement,
    HtmlFormElement, HtmlInputElement, KeyboardEvent, Node,
};

use super::host::Host;
use super::scan::ListenerPlan;
use crate::selectors::EXTRA_FORM_NAMES;

fn listen(
    host: &Rc<Host>,
    target: &EventTarget,
    kind: &str,
    passive: bool,
    handler: impl Fn(&Host, &Event) + 'static,
) -> Result<(), JsValue> {
    let weak = Rc::downgrade(host);
    let closure = Closure::<dyn Fn(Event)>::new(move |event: Event| {
        if let Some(host) = weak.upgrade() {
            handler(&host, &event);
        }
    });
    if passive {
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
    } else {
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    }
    closure.forget();
    Ok(())
}

fn listen_node(
    host: &Rc<Host>,
    node: NodeRef,
    kind: &str,
    handler: impl Fn(&Host, &Event) + 'static,
) -> Result<(), JsValue> {
    match host.element(node) {
        Some(element) => listen(host, element, kind, false, handler),
        None => Ok(()),
    }
}

fn prevent_if(event: &Event, prevent: bool) {
    if prevent {
        event.prevent_default();
    }
}

pub(crate) fn attach(host: &Rc<Host>, plan: &ListenerPlan) -> Result<(), JsValue> {
    attach_navigation(host, plan)?;
    attach_page(host, plan)?;
    attach_form(host, plan)?;

    for (index, &details) in plan.faq_items.iter().enumerate() {
        listen_node(host, details, "toggle", move |host, event| {
            let open = event
                .current_target()
                .and_then(|t| t.dyn_into::<HtmlDetailsElement>().ok())
                .is_some_and(|d| d.open());
            host.dispatch(PageEvent::FaqToggled { index, open });
        })?;
    }
    for (index, &button) in plan.filter_buttons.iter().enumerate() {
        listen_node(host, button, "click", move |host, _| {
            host.dispatch(PageEvent::FilterClicked { index });
        })?;
    }
    for &link in &plan.tel_links {
        listen_node(host, link, "click", |host, _| {
            host.dispatch(PageEvent::TelLinkClicked);
        })?;
    }
    Ok(())
}

fn attach_navigation(host: &Rc<Host>, plan: &ListenerPlan) -> Result<(), JsValue> {
    if let Some(button) = plan.menu_button {
        listen_node(host, button, "click", |host, _| {
            host.dispatch(PageEvent::MenuButtonClicked);
        })?;
    }
    for &link in &plan.nav_links {
        listen_node(host, link, "click", |host, _| {
            host.dispatch(PageEvent::NavLinkClicked {
                viewport_width: host.viewport_width(),
            });
        })?;
    }

    if plan.menu_button.is_some() {
        let focusables = plan.menu_focusables.clone();
        listen(host, &host.document, "keydown", false, move |host, event| {
            let Some(keyboard) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let key = Key::from_dom(&keyboard.key(), keyboard.shift_key());
            if key == Key::Other {
                return;
            }
            let focused = host
                .document
                .active_element()
                .and_then(|el| host.registry.find(&el));
            // A null offsetParent means the element is not rendered.
            let hidden = focusables
                .iter()
                .copied()
                .filter(|&node| {
                    host.element(node)
                        .and_then(|el| el.dyn_ref::<HtmlElement>().map(HtmlElement::offset_parent))
                        .is_none_or(|parent| parent.is_none())
                })
                .collect();
            prevent_if(
                event,
                host.dispatch(PageEvent::KeyDown {
                    key,
                    focused,
                    hidden,
                }),
            );
        })?;

        let menu_nodes: Vec<NodeRef> = plan
            .menu_button
            .into_iter()
            .chain(plan.nav_panel)
            .collect();
        listen(host, &host.document, "click", false, move |host, event| {
            let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
            let inside_menu = menu_nodes
                .iter()
                .filter_map(|&n| host.element(n))
                .any(|el| el.contains(target.as_ref()));
            host.dispatch(PageEvent::DocumentClicked { inside_menu });
        })?;
    }

    for (index, &toggle) in plan.dropdown_toggles.iter().enumerate() {
        listen_node(host, toggle, "click", move |host, event| {
            let prevent = host.dispatch(PageEvent::DropdownToggleClicked {
                index,
                viewport_width: host.viewport_width(),
            });
            prevent_if(event, prevent);
        })?;
    }
    Ok(())
}

fn attach_page(host: &Rc<Host>, plan: &ListenerPlan) -> Result<(), JsValue> {
    listen(host, &host.window, "scroll", true, |host, _| {
        host.dispatch(PageEvent::Scrolled {
            scroll_y: host.scroll_y(),
            viewport_height: host.viewport_height(),
        });
    })?;

    let header = plan.header;
    for (index, &(link, target)) in plan.anchors.iter().enumerate() {
        listen_node(host, link, "click", move |host, event| {
            let prevent = host.dispatch(PageEvent::AnchorClicked {
                index,
                target_top: host.top_of(target),
                scroll_y: host.scroll_y(),
                header_height: host.height_of(header),
            });
            prevent_if(event, prevent);
        })?;
    }

    listen(host, &host.window, "beforeprint", false, |host, _| {
        host.dispatch(PageEvent::BeforePrint {
            title: host.document.title(),
        });
    })?;

    let ready_state = Reflect::get(host.document.as_ref(), &JsValue::from_str("readyState"))
        .ok()
        .and_then(|v| v.as_string());
    if ready_state.as_deref() == Some("complete") {
        host.dispatch(PageEvent::Loaded {
            secure_context: host.window.is_secure_context(),
        });
    } else {
        listen(host, &host.window, "load", false, |host, _| {
            host.dispatch(PageEvent::Loaded {
                secure_context: host.window.is_secure_context(),
            });
        })?;
    }
    Ok(())
}

fn attach_form(host: &Rc<Host>, plan: &ListenerPlan) -> Result<(), JsValue> {
    for &input in &plan.inputs {
        listen_node(host, input, "blur", move |host, _| {
            let value = input_value(host, input);
            host.dispatch(PageEvent::FieldBlurred { node: input, value });
        })?;
        listen_node(host, input, "input", move |host, _| {
            let value = input_value(host, input);
            host.dispatch(PageEvent::FieldInput { node: input, value });
        })?;
    }

    if let Some(form) = plan.form {
        listen_node(host, form, "submit", move |host, event| {
            let data = host
                .element(form)
                .and_then(|el| el.dyn_ref::<HtmlFormElement>())
                .map(collect_form_data)
                .unwrap_or_default();
            prevent_if(event, host.dispatch(PageEvent::FormSubmitted { data }));
        })?;
    }
    Ok(())
}

fn input_value(host: &Host, node: NodeRef) -> String {
    host.element(node)
        .and_then(|el| el.dyn_ref::<HtmlInputElement>())
        .map(HtmlInputElement::value)
        .unwrap_or_default()
}

fn collect_form_data(form: &HtmlFormElement) -> FormData {
    let mut data = FormData::new();
    let Ok(raw) = web_sys::FormData::new_with_form(form) else {
        return data;
    };
    let names = FieldId::ALL.into_iter().map(FieldId::name).chain(EXTRA_FORM_NAMES);
    for name in names {
        for value in raw.get_all(name).iter() {
            if let Some(value) = value.as_string() {
                data.append(name, value);
            }
        }
    }
    data
}
