use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use thiserror::Error;
use wp_types::{RawWave, TxHash, TxReceipt, WalletAddress, WaveEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ProviderAbsent,
    UserRejected,
    ChainReverted,
    NetworkFailure,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("no injected wallet provider")]
    ProviderAbsent,
    #[error("request rejected by user: {0}")]
    UserRejected(String),
    #[error("transaction reverted: {0}")]
    Reverted(String),
    #[error("network failure: {0}")]
    Network(String),
    #[error("malformed provider response: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProviderAbsent => ErrorKind::ProviderAbsent,
            Self::UserRejected(_) => ErrorKind::UserRejected,
            Self::Reverted(_) => ErrorKind::ChainReverted,
            Self::Network(_) | Self::Decode(_) => ErrorKind::NetworkFailure,
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

pub type WaveListener = Rc<dyn Fn(WaveEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);

/// Capability over the injected wallet and the WavePortal contract.
///
/// Browser futures are not `Send`, so neither is this trait.
#[async_trait(?Send)]
pub trait WalletGateway {
    /// Accounts already authorized for this site (`eth_accounts`).
    async fn accounts(&self) -> GatewayResult<Vec<WalletAddress>>;
    /// Prompts the wallet for access (`eth_requestAccounts`).
    async fn request_accounts(&self) -> GatewayResult<Vec<WalletAddress>>;
    async fn total_waves(&self) -> GatewayResult<u64>;
    async fn all_waves(&self) -> GatewayResult<Vec<RawWave>>;
    /// Submits `wave(message)` and returns once the wallet has broadcast it.
    async fn send_wave(&self, message: &str) -> GatewayResult<TxHash>;
    async fn wait_for_confirmation(&self, tx_hash: &TxHash) -> GatewayResult<TxReceipt>;
    fn subscribe_new_waves(&self, listener: WaveListener) -> GatewayResult<SubscriptionId>;
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Listener bookkeeping shared by gateway implementations.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: Cell<u64>,
    listeners: RefCell<BTreeMap<SubscriptionId, WaveListener>>,
}

impl ListenerRegistry {
    pub fn register(&self, listener: WaveListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().insert(id, listener);
        id
    }

    pub fn remove(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow_mut().remove(&id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Delivers `event` to every listener in registration order.
    ///
    /// Listeners are snapshotted first so they may (un)subscribe while running.
    pub fn dispatch(&self, event: &WaveEvent) {
        let snapshot: Vec<WaveListener> = self.listeners.borrow().values().cloned().collect();
        for listener in snapshot {
            listener(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(message: &str) -> WaveEvent {
        RawWave {
            waver: "0x01".into(),
            timestamp_secs: 1,
            message: message.to_owned(),
        }
        .into()
    }

    #[test]
    fn error_kinds_collapse_decode_into_network() {
        assert_eq!(GatewayError::ProviderAbsent.kind(), ErrorKind::ProviderAbsent);
        assert_eq!(GatewayError::UserRejected("no".into()).kind(), ErrorKind::UserRejected);
        assert_eq!(GatewayError::Reverted("x".into()).kind(), ErrorKind::ChainReverted);
        assert_eq!(GatewayError::Network("x".into()).kind(), ErrorKind::NetworkFailure);
        assert_eq!(GatewayError::Decode("x".into()).kind(), ErrorKind::NetworkFailure);
    }

    #[test]
    fn removed_listener_receives_nothing() {
        let registry = ListenerRegistry::default();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        let id = registry.register(Rc::new(move |e: WaveEvent| sink.borrow_mut().push(e)));
        registry.dispatch(&event("first"));
        assert!(registry.remove(id));
        registry.dispatch(&event("second"));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].wave.message, "first");
        assert!(registry.is_empty());
    }

    #[test]
    fn listener_may_unsubscribe_itself_during_dispatch() {
        let registry = Rc::new(ListenerRegistry::default());
        let calls = Rc::new(Cell::new(0));
        let own_id = Rc::new(Cell::new(None::<SubscriptionId>));

        let reg = registry.clone();
        let count = calls.clone();
        let slot = own_id.clone();
        let id = registry.register(Rc::new(move |_| {
            count.set(count.get() + 1);
            if let Some(id) = slot.get() {
                reg.remove(id);
            }
        }));
        own_id.set(Some(id));

        registry.dispatch(&event("a"));
        registry.dispatch(&event("b"));

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn ids_are_unique() {
        let registry = ListenerRegistry::default();
        let a = registry.register(Rc::new(|_| {}));
        let b = registry.register(Rc::new(|_| {}));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }
}
