//! In-memory swap contract with a static price table

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::Rng;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::chain::{ChainReader, ChainSimulator, ChainWriter, PreparedRequest, TxReceipt};
use crate::domain::swap::{Clock, SwapIntent};
use crate::shared::config::{AppConfig, MockConfig};
use crate::shared::errors::ChainError;
use crate::shared::types::{Address, Token};

const BPS: u128 = 10_000;

/// Prices in micro-USD; every pair is priced through USD
pub struct MockSwapContract {
    address: Address,
    prices: HashMap<String, u64>,
    config: MockConfig,
    clock: Arc<dyn Clock>,
    submitted: Mutex<Vec<TxReceipt>>,
}

impl MockSwapContract {
    pub fn new(
        address: Address,
        prices: HashMap<String, u64>,
        config: MockConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            address,
            prices,
            config,
            clock,
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn from_config(config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        let prices = config
            .tokens
            .iter()
            .map(|t| (t.symbol.to_lowercase(), t.mock_price_micro_usd))
            .collect();
        Self::new(config.contract.address, prices, config.mock.clone(), clock)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn price_micro_usd(&self, symbol: &str) -> Option<u64> {
        self.prices.get(&symbol.to_lowercase()).copied()
    }

    /// Receipts of every accepted submission
    pub fn submitted(&self) -> Vec<TxReceipt> {
        self.submitted.lock().clone()
    }

    /// `getAmountOut` without the simulated latency
    pub fn quote(&self, token_in: &Token, token_out: &Token, amount_in: u128) -> Result<u128, ChainError> {
        let price_in = self
            .price_micro_usd(&token_in.symbol)
            .ok_or_else(|| ChainError::UnsupportedToken(token_in.symbol.clone()))?;
        let price_out = self
            .price_micro_usd(&token_out.symbol)
            .ok_or_else(|| ChainError::UnsupportedToken(token_out.symbol.clone()))?;

        if token_in.symbol == token_out.symbol {
            return Err(ChainError::IdenticalTokens(token_in.symbol.clone()));
        }
        if amount_in == 0 {
            return Err(ChainError::Reverted("INSUFFICIENT_INPUT_AMOUNT".to_string()));
        }

        let fee = self.config.fee_bps as u128;
        let after_fee = amount_in / BPS * (BPS - fee) + amount_in % BPS * (BPS - fee) / BPS;

        let value = after_fee
            .checked_mul(price_in as u128)
            .ok_or(ChainError::Overflow)?
            / price_out as u128;

        rescale(value, token_in.decimals, token_out.decimals)
    }

    fn check_deadline(&self, intent: &SwapIntent) -> Result<(), ChainError> {
        if intent.is_expired(self.clock.now()) {
            return Err(ChainError::DeadlineExpired);
        }
        Ok(())
    }

    fn execute(&self, intent: &SwapIntent) -> Result<u128, ChainError> {
        self.check_deadline(intent)?;
        let amount_out = self.quote(&intent.token_in, &intent.token_out, intent.amount_in)?;
        if amount_out < intent.amount_out_min {
            return Err(ChainError::InsufficientOutput {
                expected: amount_out,
                minimum: intent.amount_out_min,
            });
        }
        Ok(amount_out)
    }

    async fn wait(&self) {
        let delay = {
            let jitter = if self.config.jitter_ms > 0 {
                rand::thread_rng().gen_range(0..=self.config.jitter_ms)
            } else {
                0
            };
            self.config.latency_ms + jitter
        };
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }
}

fn rescale(value: u128, from_decimals: u8, to_decimals: u8) -> Result<u128, ChainError> {
    if to_decimals >= from_decimals {
        let factor = 10u128
            .checked_pow((to_decimals - from_decimals) as u32)
            .ok_or(ChainError::Overflow)?;
        value.checked_mul(factor).ok_or(ChainError::Overflow)
    } else {
        let factor = 10u128
            .checked_pow((from_decimals - to_decimals) as u32)
            .ok_or(ChainError::Overflow)?;
        Ok(value / factor)
    }
}

#[async_trait]
impl ChainReader for MockSwapContract {
    async fn get_amount_out(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount_in: u128,
    ) -> Result<u128, ChainError> {
        self.wait().await;
        let amount_out = self.quote(token_in, token_out, amount_in)?;
        debug!(
            "getAmountOut({}, {}, {}) = {}",
            token_in.symbol, token_out.symbol, amount_in, amount_out
        );
        Ok(amount_out)
    }
}

#[async_trait]
impl ChainSimulator for MockSwapContract {
    async fn simulate(&self, intent: &SwapIntent) -> Result<PreparedRequest, ChainError> {
        self.wait().await;
        let expected_amount_out = self.execute(intent)?;
        Ok(PreparedRequest {
            id: Uuid::new_v4(),
            contract: self.address,
            intent: intent.clone(),
            expected_amount_out,
            gas_estimate: self.config.gas_estimate,
        })
    }
}

#[async_trait]
impl ChainWriter for MockSwapContract {
    async fn submit(&self, request: &PreparedRequest, from: Address) -> Result<TxReceipt, ChainError> {
        if request.contract != self.address {
            return Err(ChainError::Reverted(format!(
                "request targets {}, not {}",
                request.contract, self.address
            )));
        }
        self.wait().await;
        self.execute(&request.intent)?;

        let hash_bytes: [u8; 32] = rand::random();
        let receipt = TxReceipt {
            hash: format!("0x{}", hex::encode(hash_bytes)),
            request_id: request.id,
            submitted_at: self.clock.now(),
        };
        info!("Accepted swap from {} as {}", from.short(), receipt.hash);
        self.submitted.lock().push(receipt.clone());
        Ok(receipt)
    }
}
