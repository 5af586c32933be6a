//! Explicit connection state machine.

use wp_gateway::ErrorKind;
use wp_types::WalletAddress;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected(WalletAddress),
    Error(ErrorKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    ConnectRequested,
    /// An account was granted, either on request or found by silent detection.
    Authorized(WalletAddress),
    NoAccounts,
    Failed(ErrorKind),
}

impl ConnectionState {
    pub fn transition(self, event: ConnectionEvent) -> Self {
        use ConnectionEvent as E;

        match (self, event) {
            // sticky for the rest of the session
            (connected @ Self::Connected(_), _) => connected,

            (Self::Disconnected | Self::Error(_), E::ConnectRequested) => Self::Connecting,
            (Self::Disconnected | Self::Connecting | Self::Error(_), E::Authorized(account)) => {
                Self::Connected(account)
            }
            (Self::Connecting, E::NoAccounts) => Self::Disconnected,
            (Self::Connecting, E::Failed(kind)) => Self::Error(kind),

            (state, _) => state,
        }
    }

    pub fn account(&self) -> Option<&WalletAddress> {
        match self {
            Self::Connected(account) => Some(account),
            _ => None,
        }
    }
}

/// Stage reported to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Disconnected,
    Connecting,
    Connected,
    Subscribed,
    Error(ErrorKind),
}

impl Stage {
    pub fn of(state: &ConnectionState, subscribed: bool) -> Self {
        match state {
            ConnectionState::Disconnected => Self::Disconnected,
            ConnectionState::Connecting => Self::Connecting,
            ConnectionState::Connected(_) if subscribed => Self::Subscribed,
            ConnectionState::Connected(_) => Self::Connected,
            ConnectionState::Error(kind) => Self::Error(*kind),
        }
    }

    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected | Self::Subscribed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> WalletAddress {
        "0xa11ce".into()
    }

    #[test]
    fn connect_happy_path() {
        let state = ConnectionState::Disconnected
            .transition(ConnectionEvent::ConnectRequested)
            .transition(ConnectionEvent::Authorized(alice()));

        assert_eq!(state, ConnectionState::Connected(alice()));
        assert_eq!(state.account(), Some(&alice()));
    }

    #[test]
    fn silent_detection_connects_without_request() {
        let state = ConnectionState::Disconnected.transition(ConnectionEvent::Authorized(alice()));
        assert_eq!(state, ConnectionState::Connected(alice()));
    }

    #[test]
    fn failure_while_connecting_is_an_error_state() {
        let state = ConnectionState::Disconnected
            .transition(ConnectionEvent::ConnectRequested)
            .transition(ConnectionEvent::Failed(ErrorKind::UserRejected));

        assert_eq!(state, ConnectionState::Error(ErrorKind::UserRejected));
        assert_eq!(state.account(), None);

        // retry from the error state
        let state = state.transition(ConnectionEvent::ConnectRequested);
        assert_eq!(state, ConnectionState::Connecting);
    }

    #[test]
    fn empty_grant_returns_to_disconnected() {
        let state = ConnectionState::Connecting.transition(ConnectionEvent::NoAccounts);
        assert_eq!(state, ConnectionState::Disconnected);
    }

    #[test]
    fn connected_ignores_later_events() {
        let connected = ConnectionState::Connected(alice());
        for event in [
            ConnectionEvent::ConnectRequested,
            ConnectionEvent::NoAccounts,
            ConnectionEvent::Failed(ErrorKind::NetworkFailure),
            ConnectionEvent::Authorized("0xb0b".into()),
        ] {
            assert_eq!(connected.clone().transition(event), connected);
        }
    }

    #[test]
    fn failure_outside_connecting_is_ignored() {
        let state = ConnectionState::Disconnected
            .transition(ConnectionEvent::Failed(ErrorKind::NetworkFailure));
        assert_eq!(state, ConnectionState::Disconnected);
    }

    #[test]
    fn stage_reports_subscription_only_when_connected() {
        assert_eq!(
            Stage::of(&ConnectionState::Connected(alice()), true),
            Stage::Subscribed
        );
        assert_eq!(
            Stage::of(&ConnectionState::Connected(alice()), false),
            Stage::Connected
        );
        assert_eq!(
            Stage::of(&ConnectionState::Disconnected, true),
            Stage::Disconnected
        );
        assert!(Stage::Subscribed.is_connected());
        assert!(!Stage::Error(ErrorKind::ProviderAbsent).is_connected());
    }
}
