#![forbid(unsafe_code)]

//! Headless document that applies [`Patch`]es.
//!
//! Just enough of a DOM to observe what the controller asked for: per-element
//! attributes, classes, inline styles, control values, disabled flags and
//! text, plus the document-level state (focus, scroll lock, scroll offset,
//! live announcements, alerts, injected style sheets).
//!
//! Elements spring into existence the first time a patch targets them, so a
//! fixture only has to author the state it cares about.

use std::collections::{BTreeMap, BTreeSet};

use pagectl_core::{AnnouncementId, DomOp, NodeRef, Patch};
use serde_json::{Value, json};

/// Checksum prefix used in transcripts.
pub const CHECKSUM_PREFIX: &str = "blake3:";

/// One element's observable state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    attrs: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    styles: BTreeMap<String, String>,
    value: String,
    disabled: bool,
    text: String,
}

impl Element {
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    #[must_use]
    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    fn snapshot(&self) -> Value {
        json!({
            "attrs": self.attrs,
            "classes": self.classes,
            "styles": self.styles,
            "value": self.value,
            "disabled": self.disabled,
            "text": self.text,
        })
    }
}

/// In-memory document.
#[derive(Debug, Clone, Default)]
pub struct HeadlessDocument {
    elements: BTreeMap<NodeRef, Element>,
    forms: BTreeMap<NodeRef, Vec<NodeRef>>,
    focused: Option<NodeRef>,
    focus_moves: usize,
    body_locked: bool,
    scroll_y: f64,
    last_scroll_smooth: Option<bool>,
    announcements: BTreeMap<AnnouncementId, String>,
    announced: Vec<String>,
    alerts: Vec<String>,
    style_sheets: Vec<String>,
    applied_ops: usize,
}

impl HeadlessDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Authoring ----------------------------------------------------------

    /// Author an attribute before the controller runs.
    pub fn author_attr(&mut self, node: NodeRef, name: &str, value: &str) {
        self.element_mut(node)
            .attrs
            .insert(name.to_owned(), value.to_owned());
    }

    /// Author a class before the controller runs.
    pub fn author_class(&mut self, node: NodeRef, class: &str) {
        self.element_mut(node).classes.insert(class.to_owned());
    }

    /// Declare the controls a form resets.
    pub fn author_form(&mut self, form: NodeRef, controls: impl IntoIterator<Item = NodeRef>) {
        self.forms.insert(form, controls.into_iter().collect());
    }

    /// Simulate the user editing a control.
    pub fn type_value(&mut self, node: NodeRef, value: &str) {
        value.clone_into(&mut self.element_mut(node).value);
    }

    /// Simulate the user moving focus.
    pub fn set_focus(&mut self, node: Option<NodeRef>) {
        self.focused = node;
    }

    // --- Applying -----------------------------------------------------------

    /// Apply every operation of `patch` in order.
    pub fn apply(&mut self, patch: &Patch) {
        for op in patch {
            self.apply_op(op);
        }
    }

    fn apply_op(&mut self, op: &DomOp) {
        self.applied_ops += 1;
        match op {
            DomOp::SetAttr { node, name, value } => {
                self.element_mut(*node)
                    .attrs
                    .insert((*name).to_owned(), value.clone());
            }
            DomOp::RemoveAttr { node, name } => {
                self.element_mut(*node).attrs.remove(*name);
            }
            DomOp::ToggleClass { node, class, on } => {
                let classes = &mut self.element_mut(*node).classes;
                if *on {
                    classes.insert((*class).to_owned());
                } else {
                    classes.remove(*class);
                }
            }
            DomOp::SetStyle {
                node,
                property,
                value,
            } => {
                let styles = &mut self.element_mut(*node).styles;
                match value {
                    Some(v) => {
                        styles.insert((*property).to_owned(), v.clone());
                    }
                    None => {
                        styles.remove(*property);
                    }
                }
            }
            DomOp::SetValue { node, value } => value.clone_into(&mut self.element_mut(*node).value),
            DomOp::SetDisabled { node, disabled } => self.element_mut(*node).disabled = *disabled,
            DomOp::SetText { node, text } => text.clone_into(&mut self.element_mut(*node).text),
            DomOp::Focus { node, .. } => {
                self.focused = Some(*node);
                self.focus_moves += 1;
            }
            DomOp::LockBodyScroll(locked) => self.body_locked = *locked,
            DomOp::ScrollTo { top, smooth } => {
                self.scroll_y = *top;
                self.last_scroll_smooth = Some(*smooth);
            }
            DomOp::ResetForm { form } => {
                let controls = self.forms.get(form).cloned().unwrap_or_default();
                for control in controls {
                    self.element_mut(control).value.clear();
                }
            }
            DomOp::InjectStyle { css } => self.style_sheets.push(css.clone()),
            DomOp::Announce { id, text } => {
                self.announcements.insert(*id, text.clone());
                self.announced.push(text.clone());
            }
            DomOp::RemoveAnnouncement { id } => {
                self.announcements.remove(id);
            }
            DomOp::Alert { message } => self.alerts.push(message.clone()),
        }
    }

    fn element_mut(&mut self, node: NodeRef) -> &mut Element {
        self.elements.entry(node).or_default()
    }

    // --- Inspection ---------------------------------------------------------

    /// Element state; an untouched node reads as an empty element.
    #[must_use]
    pub fn element(&self, node: NodeRef) -> Element {
        self.elements.get(&node).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn attr(&self, node: NodeRef, name: &str) -> Option<String> {
        self.elements
            .get(&node)
            .and_then(|e| e.attr(name))
            .map(str::to_owned)
    }

    #[must_use]
    pub fn has_class(&self, node: NodeRef, class: &str) -> bool {
        self.elements.get(&node).is_some_and(|e| e.has_class(class))
    }

    #[must_use]
    pub fn style(&self, node: NodeRef, property: &str) -> Option<String> {
        self.elements
            .get(&node)
            .and_then(|e| e.style(property))
            .map(str::to_owned)
    }

    #[must_use]
    pub fn value(&self, node: NodeRef) -> &str {
        self.elements.get(&node).map_or("", Element::value)
    }

    #[must_use]
    pub fn is_disabled(&self, node: NodeRef) -> bool {
        self.elements.get(&node).is_some_and(Element::is_disabled)
    }

    #[must_use]
    pub fn text(&self, node: NodeRef) -> &str {
        self.elements.get(&node).map_or("", Element::text)
    }

    #[must_use]
    pub fn focused(&self) -> Option<NodeRef> {
        self.focused
    }

    /// Nodes carrying the `hidden` attribute, in node order.
    #[must_use]
    pub fn hidden_nodes(&self) -> Vec<NodeRef> {
        self.elements
            .iter()
            .filter(|(_, el)| el.attr("hidden").is_some())
            .map(|(&node, _)| node)
            .collect()
    }

    /// Number of programmatic focus moves applied so far.
    #[must_use]
    pub fn focus_moves(&self) -> usize {
        self.focus_moves
    }

    #[must_use]
    pub fn body_locked(&self) -> bool {
        self.body_locked
    }

    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Whether the last programmatic scroll was smooth.
    #[must_use]
    pub fn last_scroll_smooth(&self) -> Option<bool> {
        self.last_scroll_smooth
    }

    /// Announcements currently present, oldest first.
    #[must_use]
    pub fn live_announcements(&self) -> Vec<&str> {
        self.announcements.values().map(String::as_str).collect()
    }

    /// Every announcement ever appended, including removed ones.
    #[must_use]
    pub fn announcement_history(&self) -> &[String] {
        &self.announced
    }

    #[must_use]
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    #[must_use]
    pub fn style_sheets(&self) -> &[String] {
        &self.style_sheets
    }

    #[must_use]
    pub fn applied_ops(&self) -> usize {
        self.applied_ops
    }

    /// Stable JSON view of the whole document.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        let elements: serde_json::Map<String, Value> = self
            .elements
            .iter()
            .map(|(node, el)| (node.0.to_string(), el.snapshot()))
            .collect();
        json!({
            "elements": elements,
            "focused": self.focused.map(|n| n.0),
            "body_locked": self.body_locked,
            "scroll_y": self.scroll_y,
            "announcements": self.live_announcements(),
            "alerts": self.alerts,
            "style_sheets": self.style_sheets,
        })
    }

    /// BLAKE3 digest of [`HeadlessDocument::snapshot`].
    #[must_use]
    pub fn checksum(&self) -> String {
        let bytes = self.snapshot().to_string();
        let hash = blake3::hash(bytes.as_bytes());
        format!("{CHECKSUM_PREFIX}{}", hash.to_hex())
    }
}
