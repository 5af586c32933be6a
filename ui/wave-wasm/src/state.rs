//! Global application state.
//!
//! Uses `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded).

use crate::provider::InjectedProvider;
use std::cell::RefCell;
use std::rc::Rc;
use wp_client::{WaveClient, WaveSubscription};
use wp_contract::ContractGateway;

pub type PageClient = WaveClient<ContractGateway<InjectedProvider>>;

thread_local! {
    static CLIENT: RefCell<Option<Rc<PageClient>>> = const { RefCell::new(None) };
    static SUBSCRIPTION: RefCell<Option<WaveSubscription>> = const { RefCell::new(None) };
}

pub fn client() -> Option<Rc<PageClient>> {
    CLIENT.with(|c| c.borrow().clone())
}

pub fn set_client(client: Rc<PageClient>) {
    CLIENT.with(|c| *c.borrow_mut() = Some(client));
}

/// Keeps the page's `NewWave` subscription alive until replaced or cleared.
pub fn set_subscription(subscription: Option<WaveSubscription>) {
    // dropped outside the borrow: teardown reaches back into the gateway
    let previous = SUBSCRIPTION.with(|s| std::mem::replace(&mut *s.borrow_mut(), subscription));
    drop(previous);
}
