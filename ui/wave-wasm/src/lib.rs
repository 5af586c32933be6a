//! WavePortal WASM Frontend
//!
//! Pure Rust + WASM page: connect a browser wallet, wave at the contract and
//! watch the wave list grow.

pub mod dom;
pub mod events;
pub mod provider;
pub mod render;
pub mod state;
pub mod wave_ops;

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wp_client::WaveClient;
use wp_contract::{ContractGateway, WavePortalConfig};

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init().await
}

/// Main initialisation sequence: build the client, bind the page, subscribe,
/// then look for an already-authorized account.
async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;
    let config = WavePortalConfig::default();

    let gateway = Rc::new(ContractGateway::new(provider::InjectedProvider, config.clone()));
    let client = Rc::new(
        WaveClient::new(gateway, Rc::new(dom::BrowserAlert))
            .with_default_message(config.default_message.clone()),
    );
    {
        let els2 = els.clone();
        client.on_waves_changed(move |waves| render::render_waves(&els2, waves));
    }
    state::set_client(client);

    events::bind_events(&els);

    // Listen for NewWave only when a wallet is injected at mount time
    if provider::is_injected() {
        wave_ops::subscribe(&els, config.poll_interval);
    }

    wave_ops::detect_wallet(&els).await;
    render::render_stage(&els);

    Ok(())
}
