#![forbid(unsafe_code)]

//! One-time document scan.
//!
//! Every element the controller may drive is interned into a
//! [`NodeRegistry`] and described as [`Markup`]. Elements that appear in
//! several roles (a nav link that is also an in-page anchor) share one
//! [`NodeRef`]. Missing elements leave their subsystem inactive.

use pagectl_core::NodeRef;
use pagectl_runtime::{
    AnchorMarkup, DropdownMarkup, FaqMarkup, FieldId, FieldMarkup, FilterButtonMarkup,
    FormMarkup, GalleryItemMarkup, LazyImageMarkup, Markup, MenuMarkup,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, NodeList};

use crate::selectors::{
    ANCHORS, CONTACT_FORM_ID, DROPDOWN, DROPDOWN_TOGGLE, ERROR_SLOT_CLASS, FAQ_ITEMS, FAQ_SUMMARY,
    FILTER_ALL, FILTER_BUTTONS, GALLERY_ITEMS, HEADER, LAZY_IMAGES, MENU_BUTTON_ID, NAV_LINKS,
    NAV_PANEL_ID, PANEL_FOCUSABLES, PHONE_INPUT_ID, REQUIRED_INPUTS, REVEAL_TARGETS,
    STICKY_CTA_ID, SUBMIT_BUTTON, TEL_LINKS, anchor_has_target,
};

/// Bidirectional map between live elements and controller handles.
#[derive(Debug, Default)]
pub(crate) struct NodeRegistry {
    elements: Vec<Element>,
}

impl NodeRegistry {
    /// Handle for `element`, assigning a new one on first sight.
    pub(crate) fn intern(&mut self, element: &Element) -> NodeRef {
        if let Some(node) = self.find(element) {
            return node;
        }
        self.elements.push(element.clone());
        NodeRef((self.elements.len() - 1) as u32)
    }

    #[must_use]
    pub(crate) fn find(&self, element: &Element) -> Option<NodeRef> {
        self.elements
            .iter()
            .position(|e| e == element)
            .map(|i| NodeRef(i as u32))
    }

    #[must_use]
    pub(crate) fn get(&self, node: NodeRef) -> Option<&Element> {
        self.elements.get(node.0 as usize)
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.elements.len()
    }
}

/// Elements that receive listeners but are not part of [`Markup`], plus the
/// nodes listeners need to consult at event time.
#[derive(Debug, Default)]
pub(crate) struct ListenerPlan {
    pub menu_button: Option<NodeRef>,
    pub nav_panel: Option<NodeRef>,
    /// Panel focusables; checked for visibility on every keydown.
    pub menu_focusables: Vec<NodeRef>,
    pub nav_links: Vec<NodeRef>,
    pub dropdown_toggles: Vec<NodeRef>,
    pub header: Option<NodeRef>,
    pub form: Option<NodeRef>,
    /// Required inputs plus the phone input, deduplicated.
    pub inputs: Vec<NodeRef>,
    pub faq_items: Vec<NodeRef>,
    pub filter_buttons: Vec<NodeRef>,
    /// Link and resolved target of every in-page anchor, by index.
    pub anchors: Vec<(NodeRef, Option<NodeRef>)>,
    pub tel_links: Vec<NodeRef>,
}

pub(crate) struct Scan {
    pub markup: Markup,
    pub plan: ListenerPlan,
}

pub(crate) fn scan(document: &Document, registry: &mut NodeRegistry) -> Scan {
    let mut plan = ListenerPlan::default();

    let menu = match (
        document.get_element_by_id(MENU_BUTTON_ID),
        document.get_element_by_id(NAV_PANEL_ID),
    ) {
        (Some(button), Some(panel)) => {
            let focusables: Vec<NodeRef> = elements(panel.query_selector_all(PANEL_FOCUSABLES))
                .iter()
                .map(|e| registry.intern(e))
                .collect();
            plan.menu_focusables.clone_from(&focusables);
            plan.nav_links = elements(panel.query_selector_all(NAV_LINKS))
                .iter()
                .map(|e| registry.intern(e))
                .collect();
            let menu = MenuMarkup {
                button: registry.intern(&button),
                panel: registry.intern(&panel),
                focusables,
            };
            plan.menu_button = Some(menu.button);
            plan.nav_panel = Some(menu.panel);
            Some(menu)
        }
        _ => None,
    };

    let dropdowns: Vec<DropdownMarkup> = elements(document.query_selector_all(DROPDOWN_TOGGLE))
        .iter()
        .filter_map(|toggle| {
            let container = toggle.closest(DROPDOWN).ok().flatten()?;
            Some(DropdownMarkup {
                toggle: registry.intern(toggle),
                container: registry.intern(&container),
            })
        })
        .collect();
    plan.dropdown_toggles = dropdowns.iter().map(|d| d.toggle).collect();

    let sticky_cta = document
        .get_element_by_id(STICKY_CTA_ID)
        .map(|e| registry.intern(&e));
    let header = first(document.query_selector(HEADER)).map(|e| registry.intern(&e));
    plan.header = header;

    let contact_form = scan_form(document, registry);
    let phone_input = document
        .get_element_by_id(PHONE_INPUT_ID)
        .map(|e| registry.intern(&e));
    if let Some(form) = &contact_form {
        plan.form = Some(form.form);
        plan.inputs = form.fields.iter().map(|f| f.input).collect();
    }
    if let Some(phone) = phone_input
        && !plan.inputs.contains(&phone)
    {
        plan.inputs.push(phone);
    }

    let lazy_images = elements(document.query_selector_all(LAZY_IMAGES))
        .iter()
        .map(|img| LazyImageMarkup {
            node: registry.intern(img),
            data_src: img.get_attribute("data-src"),
            data_srcset: img.get_attribute("data-srcset"),
        })
        .collect();

    let reveal_targets = elements(document.query_selector_all(REVEAL_TARGETS))
        .iter()
        .map(|e| registry.intern(e))
        .collect();

    let faq_items: Vec<FaqMarkup> = elements(document.query_selector_all(FAQ_ITEMS))
        .iter()
        .map(|details| FaqMarkup {
            details: registry.intern(details),
            summary: first(details.query_selector(FAQ_SUMMARY)).map(|s| registry.intern(&s)),
        })
        .collect();
    plan.faq_items = faq_items.iter().map(|f| f.details).collect();

    let filter_buttons: Vec<FilterButtonMarkup> =
        elements(document.query_selector_all(FILTER_BUTTONS))
            .iter()
            .map(|btn| FilterButtonMarkup {
                node: registry.intern(btn),
                filter: btn
                    .get_attribute("data-filter")
                    .unwrap_or_else(|| FILTER_ALL.to_owned()),
                initially_active: btn.class_list().contains("active"),
            })
            .collect();
    plan.filter_buttons = filter_buttons.iter().map(|b| b.node).collect();

    let gallery_items = elements(document.query_selector_all(GALLERY_ITEMS))
        .iter()
        .map(|item| GalleryItemMarkup {
            node: registry.intern(item),
            category: item.get_attribute("data-category").unwrap_or_default(),
        })
        .collect();

    let anchors: Vec<AnchorMarkup> = elements(document.query_selector_all(ANCHORS))
        .iter()
        .map(|link| {
            let href = link.get_attribute("href").unwrap_or_default();
            // An href like "#1-step" is not a valid selector; treat it as
            // targetless rather than failing the scan.
            let target = anchor_has_target(&href)
                .then(|| first(document.query_selector(&href)))
                .flatten()
                .map(|t| registry.intern(&t));
            AnchorMarkup {
                link: registry.intern(link),
                href,
                target,
            }
        })
        .collect();
    plan.anchors = anchors.iter().map(|a| (a.link, a.target)).collect();

    let tel_links: Vec<NodeRef> = elements(document.query_selector_all(TEL_LINKS))
        .iter()
        .map(|e| registry.intern(e))
        .collect();
    plan.tel_links = tel_links.clone();

    Scan {
        markup: Markup {
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
            tel_links,
        },
        plan,
    }
}

fn scan_form(document: &Document, registry: &mut NodeRegistry) -> Option<FormMarkup> {
    let form = document.get_element_by_id(CONTACT_FORM_ID)?;
    let submit = first(form.query_selector(SUBMIT_BUTTON)).unwrap_or_else(|| form.clone());
    let fields = elements(form.query_selector_all(REQUIRED_INPUTS))
        .iter()
        .filter_map(|input| {
            let id = FieldId::from_name(&input.id()).or_else(|| {
                input
                    .get_attribute("name")
                    .and_then(|name| FieldId::from_name(&name))
            })?;
            let error_slot = input
                .next_element_sibling()
                .filter(|slot| slot.class_list().contains(ERROR_SLOT_CLASS))
                .map(|slot| registry.intern(&slot));
            Some(FieldMarkup {
                id,
                input: registry.intern(input),
                error_slot,
            })
        })
        .collect();
    Some(FormMarkup {
        form: registry.intern(&form),
        submit: registry.intern(&submit),
        fields,
    })
}

fn elements(list: Result<NodeList, JsValue>) -> Vec<Element> {
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn first(found: Result<Option<Element>, JsValue>) -> Option<Element> {
    found.ok().flatten()
}
