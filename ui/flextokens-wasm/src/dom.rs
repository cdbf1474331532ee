//! DOM element bindings.
//!
//! All fields are resolved once at startup. The host page must provide every
//! id bound in `Elements::bind()`.

use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlOptionElement,
    HtmlSelectElement,
};

// ── Helpers ──

fn doc() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn clear(el: &Element) {
    el.set_text_content(None);
}

pub fn get_input_value(el: &HtmlInputElement) -> String {
    el.value().trim().to_string()
}

pub fn get_select_value(el: &HtmlSelectElement) -> String {
    el.value()
}

pub fn set_select_value(el: &HtmlSelectElement, val: &str) {
    el.set_value(val);
}

pub fn has_option(sel: &HtmlSelectElement, value: &str) -> bool {
    let opts = sel.options();
    for i in 0..opts.length() {
        if let Some(opt) = opts.item(i) {
            if let Ok(o) = opt.dyn_into::<HtmlOptionElement>() {
                if o.value() == value {
                    return true;
                }
            }
        }
    }
    false
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn create_element(tag: &str) -> Element {
    doc().create_element(tag).unwrap()
}

/// `<tag class="class">text</tag>`
pub fn create_text(tag: &str, class: &str, text: &str) -> Element {
    let el = create_element(tag);
    if !class.is_empty() {
        el.set_class_name(class);
    }
    el.set_text_content(Some(text));
    el
}

pub fn create_option(value: &str, text: &str, selected: bool) -> HtmlOptionElement {
    let opt: HtmlOptionElement = create_element("option").unchecked_into();
    opt.set_value(value);
    opt.set_text_content(Some(text));
    opt.set_selected(selected);
    opt
}

pub fn append(parent: &Element, child: &Element) {
    let _ = parent.append_child(child);
}

/// Write a status line into a result element, flagged as an error or not.
pub fn set_status(el: &Element, text: &str, is_error: bool) {
    toggle_class(el, "error", is_error);
    el.set_text_content(Some(text));
}

// ── Elements struct ──

/// All DOM element references used by the FlexTokens UI.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    // Session
    pub connect_btn: HtmlElement,
    pub disconnect_btn: HtmlElement,
    pub session_status: Element,

    // Token stats
    pub token_grid: Element,
    pub refresh_stats: HtmlElement,

    // Balances
    pub balance_list: Element,
    pub refresh_balances: HtmlElement,

    // Actions
    pub action_token: HtmlSelectElement,
    pub action_source: Element,
    pub action_forms: Element,

    // Account lookup
    pub lookup_form: HtmlFormElement,
    pub lookup_account: HtmlInputElement,
    pub lookup_results: Element,

    pub toast: HtmlElement,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_typed {
    ($ty:ty, $id:expr) => {
        by_id_typed::<$ty>($id).ok_or_else(|| {
            JsValue::from_str(&format!("missing {} #{}", stringify!($ty), $id))
        })?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            connect_btn: get_typed!(HtmlElement, "connectBtn"),
            disconnect_btn: get_typed!(HtmlElement, "disconnectBtn"),
            session_status: get_el!("sessionStatus"),

            token_grid: get_el!("tokenGrid"),
            refresh_stats: get_typed!(HtmlElement, "refreshStats"),

            balance_list: get_el!("balanceList"),
            refresh_balances: get_typed!(HtmlElement, "refreshBalances"),

            action_token: get_typed!(HtmlSelectElement, "actionToken"),
            action_source: get_el!("actionSource"),
            action_forms: get_el!("actionForms"),

            lookup_form: get_typed!(HtmlFormElement, "lookupForm"),
            lookup_account: get_typed!(HtmlInputElement, "lookupAccount"),
            lookup_results: get_el!("lookupResults"),

            toast: get_typed!(HtmlElement, "toast"),
        })
    }
}
