//! DOM element bindings.
//!
//! All fields are resolved once at startup. To add new UI elements, add a
//! field here and bind it in `Elements::bind()`.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};
use wp_client::Notifier;

// ── Helpers ──

pub fn document() -> Document {
    gloo_utils::document()
}

pub fn window() -> web_sys::Window {
    gloo_utils::window()
}

pub fn by_id(id: &str) -> Option<Element> {
    document().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn create_element(tag: &str) -> Result<Element, JsValue> {
    document().create_element(tag)
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn get_input_value(el: &HtmlInputElement) -> String {
    el.value()
}

pub fn clear_input(el: &HtmlInputElement) {
    el.set_value("");
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn set_visible(el: &HtmlElement, visible: bool) {
    let display = if visible { "" } else { "none" };
    let _ = el.style().set_property("display", display);
}

/// `window.alert`, the blocking notice raised when no wallet is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserAlert;

impl Notifier for BrowserAlert {
    fn alert(&self, message: &str) {
        let _ = window().alert_with_message(message);
    }
}

// ── Elements struct ──

/// All DOM element references used by the wave page.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    pub wave_btn: HtmlElement,
    pub connect_btn: HtmlElement,
    pub message_input: HtmlInputElement,
    pub status_line: Element,
    pub wave_list: Element,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

macro_rules! get_html {
    ($id:expr) => {
        by_id_typed::<HtmlElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing html element #{}", $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            wave_btn: get_html!("waveBtn"),
            connect_btn: get_html!("connectWalletBtn"),
            message_input: get_input!("waveMessage"),
            status_line: get_el!("statusLine"),
            wave_list: get_el!("waveList"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_lookup_exists_for_every_bound_element_kind() {
        let input: fn(&str) -> Option<HtmlInputElement> = by_id_typed::<HtmlInputElement>;
        let html: fn(&str) -> Option<HtmlElement> = by_id_typed::<HtmlElement>;
        let _ = (input, html);
    }
}
