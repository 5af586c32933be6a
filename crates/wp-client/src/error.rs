use thiserror::Error;
use wp_gateway::{ErrorKind, GatewayError};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("wallet returned no accounts")]
    NoAccounts,
    #[error("already subscribed to NewWave events")]
    AlreadySubscribed,
}

impl ClientError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Gateway(err) => Some(err.kind()),
            Self::NoAccounts => Some(ErrorKind::UserRejected),
            Self::AlreadySubscribed => None,
        }
    }
}
