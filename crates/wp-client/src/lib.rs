//! Wave client: connection lifecycle, wave list and event subscription
//! on top of any `WalletGateway`.

pub mod client;
pub mod error;
pub mod notify;
pub mod state;
pub mod wave_list;

pub use client::{WaveClient, WaveSubscription};
pub use error::ClientError;
pub use notify::Notifier;
pub use state::{ConnectionEvent, ConnectionState, Stage};
pub use wave_list::{RefreshTicket, WaveList};
