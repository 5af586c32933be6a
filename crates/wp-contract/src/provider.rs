use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use wp_gateway::GatewayError;

/// EIP-1193 user rejected request.
pub const USER_REJECTED: i64 = 4001;
/// EIP-1193 unauthorized account or method.
pub const UNAUTHORIZED: i64 = 4100;
/// JSON-RPC execution reverted.
pub const EXECUTION_REVERTED: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// No provider is injected (or configured).
    Unavailable,
    /// The provider answered with an RPC error object.
    Rpc { code: i64, message: String },
    /// The request never produced an answer.
    Transport(String),
}

impl From<RequestError> for GatewayError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Unavailable => GatewayError::ProviderAbsent,
            RequestError::Rpc { code, message } => match code {
                USER_REJECTED | UNAUTHORIZED => GatewayError::UserRejected(message),
                EXECUTION_REVERTED => GatewayError::Reverted(message),
                _ if message.to_ascii_lowercase().contains("revert") => {
                    GatewayError::Reverted(message)
                }
                _ => GatewayError::Network(format!("rpc error {code}: {message}")),
            },
            RequestError::Transport(message) => GatewayError::Network(message),
        }
    }
}

/// Transport speaking the EIP-1193 `request` API.
#[async_trait(?Send)]
pub trait Eip1193Provider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RequestError>;

    /// Suspends between polls without blocking the event loop.
    async fn pause(&self, duration: Duration);
}

#[cfg(test)]
mod tests {
    use super::*;
    use wp_gateway::ErrorKind;

    fn rpc(code: i64, message: &str) -> GatewayError {
        RequestError::Rpc {
            code,
            message: message.to_owned(),
        }
        .into()
    }

    #[test]
    fn maps_eip1193_codes_to_error_kinds() {
        assert_eq!(
            GatewayError::from(RequestError::Unavailable).kind(),
            ErrorKind::ProviderAbsent
        );
        assert_eq!(rpc(4001, "User denied").kind(), ErrorKind::UserRejected);
        assert_eq!(rpc(4100, "unauthorized").kind(), ErrorKind::UserRejected);
        assert_eq!(rpc(3, "execution reverted").kind(), ErrorKind::ChainReverted);
        assert_eq!(
            rpc(-32603, "Internal JSON-RPC error: execution Reverted: Wait 15m").kind(),
            ErrorKind::ChainReverted
        );
        assert_eq!(rpc(-32005, "rate limited").kind(), ErrorKind::NetworkFailure);
        assert_eq!(
            GatewayError::from(RequestError::Transport("timeout".into())).kind(),
            ErrorKind::NetworkFailure
        );
    }
}
