//! Swap contract interface traits

use async_trait::async_trait;

use crate::shared::errors::ChainError;
use crate::shared::types::{Address, Token};
use crate::domain::swap::SwapIntent;
use super::{PreparedRequest, TxReceipt};

/// Read-only quote access (`getAmountOut`)
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn get_amount_out(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount_in: u128,
    ) -> Result<u128, ChainError>;
}

/// Dry-run of the swap call against current chain state
#[async_trait]
pub trait ChainSimulator: Send + Sync {
    async fn simulate(&self, intent: &SwapIntent) -> Result<PreparedRequest, ChainError>;
}

/// Submission of a prepared request; irreversible once accepted
#[async_trait]
pub trait ChainWriter: Send + Sync {
    async fn submit(&self, request: &PreparedRequest, from: Address) -> Result<TxReceipt, ChainError>;
}

/// Everything the swap widget needs from the contract
pub trait SwapContract: ChainReader + ChainSimulator + ChainWriter {}

impl<T> SwapContract for T where T: ChainReader + ChainSimulator + ChainWriter {}
