//! Wallet session backed by a configured account

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::info;

use crate::domain::wallet::{ConnectionState, WalletSession};
use crate::shared::errors::WalletError;
use crate::shared::types::Address;

/// Session for a single known account. `connect` succeeds immediately;
/// there is no key material here, signing is the contract's business.
pub struct LocalWalletSession {
    account: Address,
    state: RwLock<ConnectionState>,
}

impl LocalWalletSession {
    pub fn new(account: Address, connected: bool) -> Self {
        let state = if connected {
            ConnectionState::Connected(account)
        } else {
            ConnectionState::Disconnected
        };
        Self {
            account,
            state: RwLock::new(state),
        }
    }
}

#[async_trait]
impl WalletSession for LocalWalletSession {
    fn connection(&self) -> ConnectionState {
        *self.state.read()
    }

    async fn connect(&self) -> Result<Address, WalletError> {
        if self.account == Address::ZERO {
            return Err(WalletError::Rejected("no account configured".to_string()));
        }
        let mut state = self.state.write();
        if !state.is_connected() {
            info!("Wallet connected: {}", self.account);
        }
        *state = ConnectionState::Connected(self.account);
        Ok(self.account)
    }

    async fn disconnect(&self) {
        let mut state = self.state.write();
        if state.is_connected() {
            info!("Wallet disconnected");
        }
        *state = ConnectionState::Disconnected;
    }
}
