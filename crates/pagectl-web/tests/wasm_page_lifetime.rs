#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use pagectl_web::selectors::{MENU_BUTTON_ID, NAV_PANEL_ID};
use pagectl_web::start_page_controller;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn mount_menu() -> HtmlElement {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .expect("document should exist");
    let body = document.body().expect("body should exist");
    body.set_inner_html(&format!(
        r##"<button id="{MENU_BUTTON_ID}" aria-expanded="false">Menu</button>
<nav id="{NAV_PANEL_ID}"><a href="#services">Services</a><a href="#contact">Contact</a></nav>"##
    ));
    document
        .get_element_by_id(MENU_BUTTON_ID)
        .expect("menu button should be mounted")
        .dyn_into::<HtmlElement>()
        .expect("menu button should be an HTMLElement")
}

#[wasm_bindgen_test]
fn listeners_keep_running_after_handle_is_dropped() {
    let button = mount_menu();
    let controller = start_page_controller(None).expect("controller should start");
    assert!(!controller.menu_open());
    drop(controller);

    button.click();
    assert_eq!(button.get_attribute("aria-expanded").as_deref(), Some("true"));

    button.click();
    assert_eq!(button.get_attribute("aria-expanded").as_deref(), Some("false"));
}
