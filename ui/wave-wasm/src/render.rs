//! Wave list and connection rendering.

use crate::dom::{self, Elements};
use crate::state;
use wasm_bindgen::prelude::*;
use wp_client::Stage;
use wp_gateway::ErrorKind;
use wp_types::Wave;

const WAVE_CARD_STYLE: &str = "background-color: OldLace; margin-top: 16px; padding: 8px";

/// Local, human-readable time (same text as JS `Date.prototype.toString`).
pub fn format_timestamp(wave: &Wave) -> String {
    let millis = wave.timestamp.timestamp_millis() as f64;
    js_sys::Date::new(&JsValue::from_f64(millis))
        .to_string()
        .into()
}

fn wave_card(wave: &Wave) -> Result<web_sys::Element, JsValue> {
    let card = dom::create_element("div")?;
    card.set_attribute("class", "wave-card")?;
    card.set_attribute("style", WAVE_CARD_STYLE)?;

    for line in [
        format!("Address: {}", wave.address),
        format!("Time: {}", format_timestamp(wave)),
        format!("Message: {}", wave.message),
    ] {
        let row = dom::create_element("div")?;
        dom::set_text(&row, &line);
        card.append_child(&row)?;
    }
    Ok(card)
}

/// Re-render every wave card, in list order.
pub fn render_waves(els: &Elements, waves: &[Wave]) {
    let container = &els.wave_list;
    container.set_inner_html("");

    for wave in waves {
        match wave_card(wave) {
            Ok(card) => {
                let _ = container.append_child(&card);
            }
            Err(err) => gloo_console::error!("failed to render wave", err),
        }
    }
}

/// Show "Connect Wallet" only while disconnected.
pub fn render_stage(els: &Elements) {
    let Some(client) = state::client() else {
        return;
    };
    let stage = client.stage();
    dom::set_visible(&els.connect_btn, !stage.is_connected());

    match stage {
        Stage::Connected | Stage::Subscribed => {
            if let Some(account) = client.account() {
                set_status(els, &format!("Connected as {account}"));
            }
        }
        Stage::Error(kind) => set_status_error(els, describe(kind)),
        Stage::Disconnected | Stage::Connecting => {}
    }
}

pub fn describe(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::ProviderAbsent => "No wallet extension found.",
        ErrorKind::UserRejected => "Request rejected in the wallet.",
        ErrorKind::ChainReverted => "The contract reverted the transaction.",
        ErrorKind::NetworkFailure => "Network error talking to the wallet.",
    }
}

pub fn set_status(els: &Elements, msg: &str) {
    dom::remove_class(&els.status_line, "error");
    dom::set_text(&els.status_line, msg);
}

pub fn set_status_error(els: &Elements, msg: &str) {
    dom::add_class(&els.status_line, "error");
    dom::set_text(&els.status_line, msg);
}
