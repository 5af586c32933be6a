use crate::error::ClientError;
use crate::notify::Notifier;
use crate::state::{ConnectionEvent, ConnectionState, Stage};
use crate::wave_list::WaveList;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{info, warn};
use wp_gateway::{GatewayError, SubscriptionId, WalletGateway};
use wp_types::{DEFAULT_WAVE_MESSAGE, WalletAddress, Wave, WaveEvent, WaveReceipt};

type ChangeHook = Rc<RefCell<Option<Box<dyn Fn(&[Wave])>>>>;

/// Alert text shown when `connect` finds no wallet extension.
pub const NO_PROVIDER_ALERT: &str = "Get Metamask!";

/// Stateful controller behind the wave page.
///
/// All methods take `&self`; interior state is never borrowed across an
/// `.await`, so overlapping calls from UI callbacks are safe.
pub struct WaveClient<G> {
    gateway: Rc<G>,
    notifier: Rc<dyn Notifier>,
    connection: RefCell<ConnectionState>,
    waves: Rc<RefCell<WaveList>>,
    on_change: ChangeHook,
    subscription: RefCell<Option<Rc<Cell<bool>>>>,
    default_message: String,
}

impl<G: WalletGateway> WaveClient<G> {
    pub fn new(gateway: Rc<G>, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            gateway,
            notifier,
            connection: RefCell::new(ConnectionState::default()),
            waves: Rc::new(RefCell::new(WaveList::default())),
            on_change: Rc::new(RefCell::new(None)),
            subscription: RefCell::new(None),
            default_message: DEFAULT_WAVE_MESSAGE.to_owned(),
        }
    }

    pub fn with_default_message(mut self, message: impl Into<String>) -> Self {
        self.default_message = message.into();
        self
    }

    pub fn gateway(&self) -> &Rc<G> {
        &self.gateway
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection.borrow().clone()
    }

    pub fn account(&self) -> Option<WalletAddress> {
        self.connection.borrow().account().cloned()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription
            .borrow()
            .as_ref()
            .is_some_and(|active| active.get())
    }

    pub fn stage(&self) -> Stage {
        Stage::of(&self.connection.borrow(), self.is_subscribed())
    }

    pub fn waves(&self) -> Vec<Wave> {
        self.waves.borrow().to_vec()
    }

    /// Registers the hook called with the full list after every change.
    pub fn on_waves_changed(&self, hook: impl Fn(&[Wave]) + 'static) {
        *self.on_change.borrow_mut() = Some(Box::new(hook));
    }

    fn apply(&self, event: ConnectionEvent) {
        let mut state = self.connection.borrow_mut();
        *state = state.clone().transition(event);
    }

    /// Looks for an account the wallet already authorized for this site.
    ///
    /// A missing wallet is not an error here. When an account is found the
    /// wave list is refreshed once.
    pub async fn detect_wallet(&self) -> Result<Option<WalletAddress>, ClientError> {
        let accounts = match self.gateway.accounts().await {
            Ok(accounts) => accounts,
            Err(GatewayError::ProviderAbsent) => {
                info!("Make sure you have a wallet extension installed");
                return Ok(None);
            }
            Err(err) => {
                warn!("account detection failed: {err}");
                return Err(err.into());
            }
        };

        let Some(account) = accounts.into_iter().next() else {
            info!("No authorized account found");
            return Ok(None);
        };

        info!("Found an authorized account: {account}");
        self.apply(ConnectionEvent::Authorized(account.clone()));
        self.refresh_waves().await?;
        Ok(Some(account))
    }

    /// Asks the wallet for account access.
    pub async fn connect(&self) -> Result<WalletAddress, ClientError> {
        if let Some(account) = self.account() {
            return Ok(account);
        }

        self.apply(ConnectionEvent::ConnectRequested);
        let accounts = match self.gateway.request_accounts().await {
            Ok(accounts) => accounts,
            Err(err) => {
                if err == GatewayError::ProviderAbsent {
                    self.notifier.alert(NO_PROVIDER_ALERT);
                }
                warn!("connect failed: {err}");
                self.apply(ConnectionEvent::Failed(err.kind()));
                return Err(err.into());
            }
        };

        match accounts.into_iter().next() {
            Some(account) => {
                info!("Connected {account}");
                self.apply(ConnectionEvent::Authorized(account.clone()));
                Ok(account)
            }
            None => {
                warn!("wallet granted no accounts");
                self.apply(ConnectionEvent::NoAccounts);
                Err(ClientError::NoAccounts)
            }
        }
    }

    /// Sends `wave(message)` and waits until it is mined.
    ///
    /// The message goes on-chain as given; an empty one is replaced by the
    /// default message. The wave list is not touched; the mined wave arrives
    /// through the event subscription.
    pub async fn send_wave(&self, message: &str) -> Result<WaveReceipt, ClientError> {
        let message = if message.is_empty() {
            self.default_message.as_str()
        } else {
            message
        };

        self.submit_wave(message)
            .await
            .inspect_err(|err| warn!("wave failed: {err}"))
    }

    async fn submit_wave(&self, message: &str) -> Result<WaveReceipt, ClientError> {
        let before = self.total_waves().await?;
        info!("Retrieved total wave count... {before}");

        let tx_hash = self.gateway.send_wave(message).await?;
        info!("Mining... {tx_hash}");

        self.gateway.wait_for_confirmation(&tx_hash).await?;
        info!("Mined -- {tx_hash}");

        let total_waves = self.total_waves().await?;
        info!("Retrieved total wave count {total_waves}");

        Ok(WaveReceipt {
            tx_hash,
            total_waves,
        })
    }

    pub async fn total_waves(&self) -> Result<u64, ClientError> {
        Ok(self.gateway.total_waves().await?)
    }

    /// Fetches every wave from the contract and replaces the list.
    ///
    /// On failure the current list is kept.
    pub async fn refresh_waves(&self) -> Result<Vec<Wave>, ClientError> {
        let ticket = self.waves.borrow_mut().begin_refresh();

        let raw = match self.gateway.all_waves().await {
            Ok(raw) => raw,
            Err(err) => {
                warn!("fetching waves failed: {err}");
                self.waves.borrow_mut().abandon_refresh(ticket);
                return Err(err.into());
            }
        };

        let fetched: Vec<Wave> = raw.into_iter().map(Wave::from).collect();
        let applied = self.waves.borrow_mut().finish_refresh(ticket, fetched);
        if applied {
            notify_changed(&self.waves, &self.on_change);
        }
        Ok(self.waves())
    }
}

impl<G: WalletGateway + 'static> WaveClient<G> {
    /// Starts appending `NewWave` events to the list.
    ///
    /// Dropping the returned handle (or calling `teardown`) stops it.
    pub fn subscribe_to_wave_events(&self) -> Result<WaveSubscription, ClientError> {
        if self.is_subscribed() {
            return Err(ClientError::AlreadySubscribed);
        }

        let active = Rc::new(Cell::new(true));
        let listener = {
            let active = active.clone();
            let waves = self.waves.clone();
            let on_change = self.on_change.clone();
            move |event: WaveEvent| {
                if !active.get() {
                    return;
                }
                let appended = waves.borrow_mut().append(event.into());
                if appended {
                    notify_changed(&waves, &on_change);
                }
            }
        };

        let id = self.gateway.subscribe_new_waves(Rc::new(listener))?;
        *self.subscription.borrow_mut() = Some(active.clone());

        let gateway = self.gateway.clone();
        Ok(WaveSubscription {
            id,
            active,
            detach: Some(Box::new(move || gateway.unsubscribe(id))),
        })
    }
}

fn notify_changed(waves: &RefCell<WaveList>, on_change: &ChangeHook) {
    let snapshot = waves.borrow().to_vec();
    if let Some(hook) = on_change.borrow().as_ref() {
        hook(&snapshot);
    }
}

/// Live `NewWave` subscription; torn down on drop.
pub struct WaveSubscription {
    id: SubscriptionId,
    active: Rc<Cell<bool>>,
    detach: Option<Box<dyn FnOnce()>>,
}

impl WaveSubscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn teardown(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        self.active.set(false);
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for WaveSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
