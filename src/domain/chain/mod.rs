//! Chain domain - the swap contract as seen from the client

mod chain_interface;

pub use chain_interface::{ChainReader, ChainSimulator, ChainWriter, SwapContract};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::types::Address;
use crate::domain::swap::SwapIntent;

/// A validated swap call, ready to be submitted as-is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedRequest {
    pub id: Uuid,
    pub contract: Address,
    pub intent: SwapIntent,
    /// Output the dry run produced
    pub expected_amount_out: u128,
    pub gas_estimate: u64,
}

/// Accepted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub hash: String,
    pub request_id: Uuid,
    pub submitted_at: DateTime<Utc>,
}
