//! Page operations.
//!
//! Each handler drives one `WaveClient` operation and reports the outcome on
//! the console and in the status line. Wire new handlers in `events.rs`.

use crate::dom::{self, Elements};
use crate::render;
use crate::state;
use std::time::Duration;
use wp_client::ClientError;

fn report(els: &Elements, action: &str, err: &ClientError) {
    gloo_console::log!(format!("{action} failed: {err}"));
    let detail = match err.kind() {
        Some(kind) => format!("{action} failed. {}", render::describe(kind)),
        None => format!("{action} failed: {err}"),
    };
    render::set_status_error(els, &detail);
}

/// Silent account check at page load.
pub async fn detect_wallet(els: &Elements) {
    let Some(client) = state::client() else {
        return;
    };
    match client.detect_wallet().await {
        Ok(Some(account)) => gloo_console::log!(format!("Found an authorized account: {account}")),
        Ok(None) => gloo_console::log!("No authorized account found"),
        Err(err) => report(els, "Loading waves", &err),
    }
}

/// "Connect Wallet" click.
pub async fn on_connect(els: &Elements) {
    let Some(client) = state::client() else {
        return;
    };
    match client.connect().await {
        Ok(account) => gloo_console::log!(format!("Connected {account}")),
        Err(err) => report(els, "Connecting", &err),
    }
    render::render_stage(els);
}

/// "Wave at Me" click.
pub async fn on_wave(els: &Elements) {
    let Some(client) = state::client() else {
        return;
    };
    let message = dom::get_input_value(&els.message_input);

    render::set_status(els, "Confirm the wave in your wallet…");
    match client.send_wave(&message).await {
        Ok(receipt) => {
            gloo_console::log!(format!("Mined -- {}", receipt.tx_hash));
            dom::clear_input(&els.message_input);
            render::set_status(
                els,
                &format!("Wave mined. Total waves: {}", receipt.total_waves),
            );
        }
        Err(err) => report(els, "Waving", &err),
    }
}

/// Subscribe to `NewWave` and poll for logs until the subscription ends.
pub fn subscribe(els: &Elements, poll_interval: Duration) {
    let Some(client) = state::client() else {
        return;
    };
    let subscription = match client.subscribe_to_wave_events() {
        Ok(subscription) => subscription,
        Err(err) => {
            report(els, "Subscribing", &err);
            return;
        }
    };
    state::set_subscription(Some(subscription));

    wasm_bindgen_futures::spawn_local(async move {
        if let Some(client) = state::client() {
            if let Err(err) = client.gateway().anchor_events().await {
                gloo_console::log!(format!("reading the head block failed: {err}"));
            }
        }
        loop {
            gloo_timers::future::sleep(poll_interval).await;
            let Some(client) = state::client() else {
                break;
            };
            if !client.is_subscribed() {
                break;
            }
            if let Err(err) = client.gateway().poll_events().await {
                gloo_console::log!(format!("polling NewWave failed: {err}"));
            }
        }
    });
}
