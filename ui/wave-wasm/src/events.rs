//! Event binding.
//!
//! Wires all UI event listeners. Async handlers are spawned via
//! `wasm_bindgen_futures::spawn_local`.

use crate::dom::Elements;
use crate::wave_ops;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Helper: attach async click handler to an HtmlElement.
macro_rules! on_click_async {
    ($el:expr, $els:expr, $handler:expr) => {{
        let els = $els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let els2 = els.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&els2).await;
            });
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }};
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) {
    on_click_async!(els.wave_btn, els, wave_ops::on_wave);
    on_click_async!(els.connect_btn, els, wave_ops::on_connect);

    // ── Enter in the message box waves too ──
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |ev: web_sys::KeyboardEvent| {
            if ev.key() == "Enter" {
                let els3 = els2.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    wave_ops::on_wave(&els3).await;
                });
            }
        }) as Box<dyn FnMut(_)>);
        els.message_input
            .add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
}
