//! WavePortal contract boundary.
//!
//! `ContractGateway` speaks EIP-1193 (`request({method, params})`) to whatever
//! transport it is given and implements `WalletGateway` on top of it.

pub mod abi;
pub mod config;
pub mod gateway;
pub mod provider;

pub use config::{DEFAULT_WAVE_MESSAGE, WAVE_PORTAL_ADDRESS, WavePortalConfig};
pub use gateway::ContractGateway;
pub use provider::{Eip1193Provider, RequestError};
