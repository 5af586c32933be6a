use crate::abi::IWavePortal;
use crate::config::WavePortalConfig;
use crate::provider::Eip1193Provider;
use alloy_primitives::{B256, Bytes, hex};
use alloy_sol_types::{SolCall, SolEvent};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::cell::Cell;
use tracing::{debug, info, warn};
use wp_gateway::{
    GatewayError, GatewayResult, ListenerRegistry, SubscriptionId, WalletGateway, WaveListener,
};
use wp_types::{RawWave, TxHash, TxReceipt, WalletAddress, WaveEvent};

// ── JSON-RPC response shapes ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcLog {
    topics: Vec<B256>,
    data: Bytes,
    #[serde(default)]
    transaction_hash: Option<String>,
    #[serde(default)]
    log_index: Option<String>,
    #[serde(default)]
    removed: bool,
}

/// `WalletGateway` over an EIP-1193 transport, bound to one WavePortal deployment.
pub struct ContractGateway<P> {
    provider: P,
    config: WavePortalConfig,
    listeners: ListenerRegistry,
    /// First block not yet scanned for `NewWave` logs.
    next_block: Cell<Option<u64>>,
}

impl<P: Eip1193Provider> ContractGateway<P> {
    pub fn new(provider: P, config: WavePortalConfig) -> Self {
        Self {
            provider,
            config,
            listeners: ListenerRegistry::default(),
            next_block: Cell::new(None),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }

    async fn rpc<T: DeserializeOwned>(&self, method: &str, params: Value) -> GatewayResult<T> {
        let value = self.provider.request(method, params).await?;
        serde_json::from_value(value).map_err(|err| GatewayError::Decode(format!("{method}: {err}")))
    }

    async fn call<C: SolCall>(&self, call: &C) -> GatewayResult<C::Return> {
        let params = json!([
            {
                "to": self.config.contract_address,
                "data": hex::encode_prefixed(call.abi_encode()),
            },
            "latest"
        ]);
        let data: Bytes = self.rpc("eth_call", params).await?;
        C::abi_decode_returns(&data)
            .map_err(|err| GatewayError::Decode(format!("{}: {err}", C::SIGNATURE)))
    }

    async fn block_number(&self) -> GatewayResult<u64> {
        let quantity: String = self.rpc("eth_blockNumber", json!([])).await?;
        parse_quantity(&quantity)
    }

    /// Pins the log cursor to the current head unless a scan is already under way.
    ///
    /// Call right after subscribing so waves mined before the first poll are
    /// still delivered. Returns the block the next scan starts from.
    pub async fn anchor_events(&self) -> GatewayResult<u64> {
        if let Some(next) = self.next_block.get() {
            return Ok(next);
        }
        let head = self.block_number().await?;
        self.next_block.set(Some(head));
        debug!("NewWave cursor anchored at block {head}");
        Ok(head)
    }

    /// Scans new blocks for `NewWave` logs and hands each one to every listener.
    ///
    /// Without an anchor the first scan starts at the current head. Returns the number of events
    /// delivered. Does nothing while nobody is subscribed.
    pub async fn poll_events(&self) -> GatewayResult<usize> {
        if self.listeners.is_empty() {
            return Ok(0);
        }

        let head = self.block_number().await?;
        let from = self.next_block.get().unwrap_or(head);
        if from > head {
            return Ok(0);
        }

        let filter = json!([{
            "address": self.config.contract_address,
            "topics": [IWavePortal::NewWave::SIGNATURE_HASH],
            "fromBlock": format!("{from:#x}"),
            "toBlock": format!("{head:#x}"),
        }]);
        let logs: Vec<RpcLog> = self.rpc("eth_getLogs", filter).await?;
        debug!("scanned blocks {from}..={head}: {} NewWave logs", logs.len());

        let mut delivered = 0;
        for log in logs.iter().filter(|log| !log.removed) {
            match decode_new_wave(log) {
                Ok(event) => {
                    info!(
                        "NewWave {} {} {}",
                        event.wave.waver, event.wave.timestamp_secs, event.wave.message
                    );
                    self.listeners.dispatch(&event);
                    delivered += 1;
                }
                Err(err) => warn!("skipping undecodable NewWave log: {err}"),
            }
        }

        self.next_block.set(Some(head + 1));
        Ok(delivered)
    }
}

#[async_trait(?Send)]
impl<P: Eip1193Provider> WalletGateway for ContractGateway<P> {
    async fn accounts(&self) -> GatewayResult<Vec<WalletAddress>> {
        let accounts: Vec<String> = self.rpc("eth_accounts", json!([])).await?;
        Ok(accounts.into_iter().map(WalletAddress).collect())
    }

    async fn request_accounts(&self) -> GatewayResult<Vec<WalletAddress>> {
        let accounts: Vec<String> = self.rpc("eth_requestAccounts", json!([])).await?;
        Ok(accounts.into_iter().map(WalletAddress).collect())
    }

    async fn total_waves(&self) -> GatewayResult<u64> {
        let total = self.call(&IWavePortal::getTotalWavesCall {}).await?;
        Ok(total.saturating_to())
    }

    async fn all_waves(&self) -> GatewayResult<Vec<RawWave>> {
        let waves = self.call(&IWavePortal::getAllWavesCall {}).await?;
        Ok(waves
            .into_iter()
            .map(|wave| RawWave {
                waver: WalletAddress(wave.waver.to_checksum(None)),
                timestamp_secs: wave.timestamp.saturating_to(),
                message: wave.message,
            })
            .collect())
    }

    async fn send_wave(&self, message: &str) -> GatewayResult<TxHash> {
        let Some(from) = self.accounts().await?.into_iter().next() else {
            return Err(GatewayError::UserRejected("no authorized account".to_owned()));
        };

        let call = IWavePortal::waveCall {
            _message: message.to_owned(),
        };
        let tx = json!([{
            "from": from.0,
            "to": self.config.contract_address,
            "data": hex::encode_prefixed(call.abi_encode()),
        }]);
        let hash: String = self.rpc("eth_sendTransaction", tx).await?;
        Ok(TxHash(hash))
    }

    async fn wait_for_confirmation(&self, tx_hash: &TxHash) -> GatewayResult<TxReceipt> {
        loop {
            let receipt: Option<RpcReceipt> = self
                .rpc("eth_getTransactionReceipt", json!([tx_hash.0]))
                .await?;

            let Some(receipt) = receipt else {
                debug!("{tx_hash} not mined yet");
                self.provider.pause(self.config.poll_interval).await;
                continue;
            };

            let block_number = receipt.block_number.as_deref().map(parse_quantity).transpose()?;
            // pre-byzantium receipts carry no status
            let success = match receipt.status.as_deref() {
                Some(status) => parse_quantity(status)? != 0,
                None => true,
            };
            if !success {
                return Err(GatewayError::Reverted(format!(
                    "{tx_hash} reverted in block {}",
                    block_number.map_or_else(|| "?".to_owned(), |n| n.to_string())
                )));
            }

            return Ok(TxReceipt {
                tx_hash: tx_hash.clone(),
                block_number,
                success,
            });
        }
    }

    fn subscribe_new_waves(&self, listener: WaveListener) -> GatewayResult<SubscriptionId> {
        Ok(self.listeners.register(listener))
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.remove(id);
        if self.listeners.is_empty() {
            self.next_block.set(None);
        }
    }
}

fn decode_new_wave(log: &RpcLog) -> GatewayResult<WaveEvent> {
    let decoded = IWavePortal::NewWave::decode_raw_log(log.topics.iter().copied(), &log.data)
        .map_err(|err| GatewayError::Decode(format!("NewWave: {err}")))?;

    Ok(WaveEvent {
        wave: RawWave {
            waver: WalletAddress(decoded.from.to_checksum(None)),
            timestamp_secs: decoded.timestamp.saturating_to(),
            message: decoded.message,
        },
        tx_hash: log.transaction_hash.clone().map(TxHash),
        log_index: log.log_index.as_deref().map(parse_quantity).transpose()?,
    })
}

/// Parses a JSON-RPC hex quantity such as `0x1b4`.
fn parse_quantity(quantity: &str) -> GatewayResult<u64> {
    let digits = quantity
        .strip_prefix("0x")
        .ok_or_else(|| GatewayError::Decode(format!("quantity without 0x prefix: {quantity}")))?;
    u64::from_str_radix(digits, 16)
        .map_err(|err| GatewayError::Decode(format!("bad quantity {quantity}: {err}")))
}
