#![forbid(unsafe_code)]

//! Applies controller patches to the live document.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Stale or unknown [`NodeRef`] | Operation skipped, logged at debug |
//! | Browser API throws | Operation skipped, logged at warn; later operations still apply |
//! | Node has the wrong element type for the operation | Same as a throw |

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use pagectl_core::{AnnouncementId, DomOp, NodeRef, Patch};
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, FocusOptions, HtmlElement, HtmlFormElement, HtmlInputElement,
    ScrollBehavior, ScrollToOptions, Window,
};

use super::scan::NodeRegistry;
use crate::selectors::LIVE_REGION_CLASS;

pub(crate) struct Renderer {
    window: Window,
    document: Document,
    registry: Rc<NodeRegistry>,
    announcements: RefCell<HashMap<AnnouncementId, Element>>,
}

impl Renderer {
    pub(crate) fn new(window: Window, document: Document, registry: Rc<NodeRegistry>) -> Self {
        Self {
            window,
            document,
            registry,
            announcements: RefCell::new(HashMap::new()),
        }
    }

    pub(crate) fn apply(&self, patch: &Patch) {
        for op in patch {
            if let Err(err) = self.apply_op(op) {
                warn!(target: "pagectl.web", ?op, error = ?err, "DOM operation failed");
            }
        }
    }

    fn apply_op(&self, op: &DomOp) -> Result<(), JsValue> {
        if let Some(node) = op.node()
            && self.registry.get(node).is_none()
        {
            debug!(target: "pagectl.web", %node, "operation on unknown node skipped");
            return Ok(());
        }

        match op {
            DomOp::SetAttr { node, name, value } => self.element(*node)?.set_attribute(name, value)?,
            DomOp::RemoveAttr { node, name } => self.element(*node)?.remove_attribute(name)?,
            DomOp::ToggleClass { node, class, on } => {
                self.element(*node)?
                    .class_list()
                    .toggle_with_force(class, *on)?;
            }
            DomOp::SetStyle {
                node,
                property,
                value,
            } => {
                let style = self.html(*node)?.style();
                match value {
                    Some(value) => style.set_property(property, value)?,
                    None => {
                        style.remove_property(property)?;
                    }
                }
            }
            DomOp::SetValue { node, value } => self
                .element(*node)?
                .dyn_ref::<HtmlInputElement>()
                .ok_or_else(|| JsValue::from_str("SetValue target is not an input"))?
                .set_value(value),
            DomOp::SetDisabled { node, disabled } => {
                let element = self.element(*node)?;
                if *disabled {
                    element.set_attribute("disabled", "")?;
                } else {
                    element.remove_attribute("disabled")?;
                }
            }
            DomOp::SetText { node, text } => self.element(*node)?.set_text_content(Some(text)),
            DomOp::Focus {
                node,
                prevent_scroll,
            } => {
                let options = FocusOptions::new();
                options.set_prevent_scroll(*prevent_scroll);
                self.html(*node)?.focus_with_options(&options)?;
            }
            DomOp::LockBodyScroll(locked) => {
                let style = self.body()?.style();
                if *locked {
                    style.set_property("overflow", "hidden")?;
                } else {
                    style.remove_property("overflow")?;
                }
            }
            DomOp::ScrollTo { top, smooth } => {
                let options = ScrollToOptions::new();
                options.set_top(*top);
                options.set_behavior(if *smooth {
                    ScrollBehavior::Smooth
                } else {
                    ScrollBehavior::Auto
                });
                self.window.scroll_to_with_scroll_to_options(&options);
            }
            DomOp::ResetForm { form } => self
                .element(*form)?
                .dyn_ref::<HtmlFormElement>()
                .ok_or_else(|| JsValue::from_str("ResetForm target is not a form"))?
                .reset(),
            DomOp::InjectStyle { css } => {
                let style = self.document.create_element("style")?;
                style.set_text_content(Some(css));
                let head = self
                    .document
                    .head()
                    .ok_or_else(|| JsValue::from_str("document has no head"))?;
                head.append_child(&style)?;
            }
            DomOp::Announce { id, text } => {
                let region = self.document.create_element("div")?;
                region.set_attribute("role", "status")?;
                region.set_attribute("aria-live", "polite")?;
                region.set_class_name(LIVE_REGION_CLASS);
                region.set_text_content(Some(text));
                self.body()?.append_child(&region)?;
                self.announcements.borrow_mut().insert(*id, region);
            }
            DomOp::RemoveAnnouncement { id } => {
                if let Some(region) = self.announcements.borrow_mut().remove(id) {
                    region.remove();
                }
            }
            DomOp::Alert { message } => self.window.alert_with_message(message)?,
        }
        Ok(())
    }

    fn element(&self, node: NodeRef) -> Result<&Element, JsValue> {
        self.registry
            .get(node)
            .ok_or_else(|| JsValue::from_str("unknown node"))
    }

    fn html(&self, node: NodeRef) -> Result<&HtmlElement, JsValue> {
        self.element(node)?
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| JsValue::from_str("not an HTML element"))
    }

    fn body(&self) -> Result<HtmlElement, JsValue> {
        self.document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))
    }
}
