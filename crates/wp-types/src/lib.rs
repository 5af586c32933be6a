use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message sent when the user leaves the input blank.
pub const DEFAULT_WAVE_MESSAGE: &str = "Hi There!";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A wave exactly as the contract returns it: `(waver, timestamp, message)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawWave {
    pub waver: WalletAddress,
    pub timestamp_secs: u64,
    pub message: String,
}

/// A decoded `NewWave` log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WaveEvent {
    pub wave: RawWave,
    #[serde(default)]
    pub tx_hash: Option<TxHash>,
    #[serde(default)]
    pub log_index: Option<u64>,
}

impl From<RawWave> for WaveEvent {
    fn from(wave: RawWave) -> Self {
        Self {
            wave,
            tx_hash: None,
            log_index: None,
        }
    }
}

/// A wave as shown in the list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Wave {
    pub address: WalletAddress,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// Identity of a wave used when merging live events with bulk fetches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WaveKey {
    pub address: String,
    pub timestamp_secs: i64,
    pub message: String,
}

impl Wave {
    pub fn key(&self) -> WaveKey {
        WaveKey {
            address: self.address.0.to_ascii_lowercase(),
            timestamp_secs: self.timestamp.timestamp(),
            message: self.message.clone(),
        }
    }
}

impl From<RawWave> for Wave {
    fn from(raw: RawWave) -> Self {
        // contract timestamps are unix seconds
        let timestamp = i64::try_from(raw.timestamp_secs)
            .ok()
            .and_then(|secs| secs.checked_mul(1000))
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or(DateTime::UNIX_EPOCH);

        Self {
            address: raw.waver,
            timestamp,
            message: raw.message,
        }
    }
}

impl From<WaveEvent> for Wave {
    fn from(event: WaveEvent) -> Self {
        event.wave.into()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub success: bool,
}

/// Result of a confirmed `wave` transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WaveReceipt {
    pub tx_hash: TxHash,
    pub total_waves: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_wave_timestamp_is_scaled_to_millis() {
        let wave: Wave = RawWave {
            waver: "0xabc".into(),
            timestamp_secs: 1_700_000_000,
            message: "hi".to_owned(),
        }
        .into();

        assert_eq!(wave.timestamp.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(wave.address.as_str(), "0xabc");
        assert_eq!(wave.message, "hi");
    }

    #[test]
    fn out_of_range_timestamp_falls_back_to_epoch() {
        let wave: Wave = RawWave {
            waver: "0xabc".into(),
            timestamp_secs: u64::MAX,
            message: String::new(),
        }
        .into();

        assert_eq!(wave.timestamp, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn key_ignores_address_case() {
        let upper: Wave = RawWave {
            waver: "0xABCDEF".into(),
            timestamp_secs: 10,
            message: "yo".to_owned(),
        }
        .into();
        let lower: Wave = RawWave {
            waver: "0xabcdef".into(),
            timestamp_secs: 10,
            message: "yo".to_owned(),
        }
        .into();

        assert_eq!(upper.key(), lower.key());
    }

    #[test]
    fn wave_event_deserializes_without_log_position() {
        let event: WaveEvent = serde_json::from_str(
            r#"{"wave":{"waver":"0x01","timestamp_secs":5,"message":"m"}}"#,
        )
        .unwrap();

        assert_eq!(event.tx_hash, None);
        assert_eq!(event.log_index, None);
        assert_eq!(event.wave.timestamp_secs, 5);
    }
}
