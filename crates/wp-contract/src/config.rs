use alloy_primitives::{Address, address};
use std::time::Duration;

pub use wp_types::DEFAULT_WAVE_MESSAGE;

/// Deployed WavePortal instance. Update after every redeploy.
pub const WAVE_PORTAL_ADDRESS: Address = address!("0x68be02099571B9F3412ceE84a015e56a57C22A32");

/// Matches the ethers.js provider polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(4_000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavePortalConfig {
    pub contract_address: Address,
    /// Delay between receipt and log polls.
    pub poll_interval: Duration,
    pub default_message: String,
}

impl Default for WavePortalConfig {
    fn default() -> Self {
        Self {
            contract_address: WAVE_PORTAL_ADDRESS,
            poll_interval: DEFAULT_POLL_INTERVAL,
            default_message: DEFAULT_WAVE_MESSAGE.to_owned(),
        }
    }
}

impl WavePortalConfig {
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}
