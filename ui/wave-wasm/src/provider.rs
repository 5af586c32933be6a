//! Injected wallet transport.
//!
//! Forwards EIP-1193 requests to `window.ethereum.request({method, params})`.
//! The object is looked up on every call, so a wallet injected late is picked
//! up and a missing one reports `RequestError::Unavailable`.

use async_trait::async_trait;
use gloo_utils::format::JsValueSerdeExt;
use js_sys::{Function, Promise, Reflect};
use serde_json::{Value, json};
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use wp_contract::{Eip1193Provider, RequestError};

#[derive(Debug, Default, Clone, Copy)]
pub struct InjectedProvider;

fn ethereum() -> Option<JsValue> {
    let window = web_sys::window()?;
    let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
    if ethereum.is_undefined() || ethereum.is_null() {
        None
    } else {
        Some(ethereum)
    }
}

/// Whether a wallet extension injected `window.ethereum`.
pub fn is_injected() -> bool {
    ethereum().is_some()
}

fn field(target: &JsValue, name: &str) -> JsValue {
    Reflect::get(target, &JsValue::from_str(name)).unwrap_or(JsValue::UNDEFINED)
}

/// Converts a rejected `request` promise into a `RequestError`.
///
/// Wallets wrap node errors (reverts included) as `-32603` with the original
/// error under `data`, so the nested code wins when present.
fn rpc_error(err: JsValue) -> RequestError {
    let data = field(&err, "data");
    let (code, message) = match field(&data, "code").as_f64() {
        Some(code) => (Some(code), field(&data, "message")),
        None => (field(&err, "code").as_f64(), field(&err, "message")),
    };
    let message = message.as_string().unwrap_or_else(|| format!("{err:?}"));

    match code {
        Some(code) => RequestError::Rpc {
            code: code as i64,
            message,
        },
        None => RequestError::Transport(message),
    }
}

#[async_trait(?Send)]
impl Eip1193Provider for InjectedProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RequestError> {
        let Some(ethereum) = ethereum() else {
            return Err(RequestError::Unavailable);
        };

        let request: Function = field(&ethereum, "request")
            .dyn_into()
            .map_err(|_| RequestError::Transport("ethereum.request is not a function".into()))?;
        let args = JsValue::from_serde(&json!({ "method": method, "params": params }))
            .map_err(|err| RequestError::Transport(format!("{method} args: {err}")))?;

        let promise: Promise = request
            .call1(&ethereum, &args)
            .map_err(rpc_error)?
            .dyn_into()
            .map_err(|_| RequestError::Transport(format!("{method} did not return a promise")))?;
        let result = JsFuture::from(promise).await.map_err(rpc_error)?;

        if result.is_undefined() || result.is_null() {
            return Ok(Value::Null);
        }
        result
            .into_serde()
            .map_err(|err| RequestError::Transport(format!("{method} result: {err}")))
    }

    async fn pause(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}
