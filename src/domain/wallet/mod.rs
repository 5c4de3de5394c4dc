//! Wallet domain - session state owned by the wallet provider

use async_trait::async_trait;
use serde::Serialize;

use crate::shared::errors::WalletError;
use crate::shared::types::Address;

/// Connection status as reported by the wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "account", rename_all = "lowercase")]
pub enum ConnectionState {
    Connected(Address),
    Disconnected,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected(_))
    }

    pub fn account(&self) -> Option<Address> {
        match self {
            ConnectionState::Connected(address) => Some(*address),
            ConnectionState::Disconnected => None,
        }
    }
}

/// Wallet/session provider
#[async_trait]
pub trait WalletSession: Send + Sync {
    /// Current status; cheap, read on every readiness check
    fn connection(&self) -> ConnectionState;

    async fn connect(&self) -> Result<Address, WalletError>;

    async fn disconnect(&self);
}
