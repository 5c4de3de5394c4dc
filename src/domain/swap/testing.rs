//! Test doubles: a contract whose every call is handed to the test to answer

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::domain::chain::{ChainReader, ChainSimulator, ChainWriter, PreparedRequest, TxReceipt};
use crate::infrastructure::notifications::MemoryNotifier;
use crate::infrastructure::wallet::LocalWalletSession;
use crate::shared::errors::ChainError;
use crate::shared::types::{Address, Token, TokenRegistry};
use super::controller::{SwapController, SwapDeps, SwapSettings};
use super::intent::{ManualClock, SwapIntent};

pub struct QuoteCall {
    pub token_in: Token,
    pub token_out: Token,
    pub amount_in: u128,
    reply: oneshot::Sender<Result<u128, ChainError>>,
}

impl QuoteCall {
    pub fn reply(self, result: Result<u128, ChainError>) {
        let _ = self.reply.send(result);
    }
}

pub struct SimulateCall {
    pub intent: SwapIntent,
    reply: oneshot::Sender<Result<PreparedRequest, ChainError>>,
}

impl SimulateCall {
    pub fn prepared(&self, contract: Address, gas_estimate: u64) -> PreparedRequest {
        PreparedRequest {
            id: Uuid::new_v4(),
            contract,
            intent: self.intent.clone(),
            expected_amount_out: self.intent.amount_out_min,
            gas_estimate,
        }
    }

    pub fn reply(self, result: Result<PreparedRequest, ChainError>) {
        let _ = self.reply.send(result);
    }
}

pub struct SubmitCall {
    pub request: PreparedRequest,
    pub from: Address,
    reply: oneshot::Sender<Result<TxReceipt, ChainError>>,
}

impl SubmitCall {
    pub fn receipt(&self) -> TxReceipt {
        TxReceipt {
            hash: format!("0x{}", "ab".repeat(32)),
            request_id: self.request.id,
            submitted_at: Utc::now(),
        }
    }

    pub fn reply(self, result: Result<TxReceipt, ChainError>) {
        let _ = self.reply.send(result);
    }
}

pub struct ScriptedContract {
    quotes: mpsc::UnboundedSender<QuoteCall>,
    simulations: mpsc::UnboundedSender<SimulateCall>,
    submissions: mpsc::UnboundedSender<SubmitCall>,
}

/// Test side of a [`ScriptedContract`]
pub struct ContractScript {
    quotes: mpsc::UnboundedReceiver<QuoteCall>,
    simulations: mpsc::UnboundedReceiver<SimulateCall>,
    submissions: mpsc::UnboundedReceiver<SubmitCall>,
}

impl ContractScript {
    pub async fn next_quote(&mut self) -> QuoteCall {
        self.quotes.recv().await.expect("contract dropped")
    }

    pub async fn next_simulation(&mut self) -> SimulateCall {
        self.simulations.recv().await.expect("contract dropped")
    }

    pub async fn next_submission(&mut self) -> SubmitCall {
        self.submissions.recv().await.expect("contract dropped")
    }
}

pub fn scripted_contract() -> (ScriptedContract, ContractScript) {
    let (quotes_tx, quotes) = mpsc::unbounded_channel();
    let (simulations_tx, simulations) = mpsc::unbounded_channel();
    let (submissions_tx, submissions) = mpsc::unbounded_channel();
    (
        ScriptedContract {
            quotes: quotes_tx,
            simulations: simulations_tx,
            submissions: submissions_tx,
        },
        ContractScript {
            quotes,
            simulations,
            submissions,
        },
    )
}

async fn await_reply<T>(reply: oneshot::Receiver<Result<T, ChainError>>) -> Result<T, ChainError> {
    reply
        .await
        .map_err(|_| ChainError::Network("script dropped the call".to_string()))?
}

fn closed() -> ChainError {
    ChainError::Network("script closed".to_string())
}

#[async_trait]
impl ChainReader for ScriptedContract {
    async fn get_amount_out(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount_in: u128,
    ) -> Result<u128, ChainError> {
        let (reply, rx) = oneshot::channel();
        self.quotes
            .send(QuoteCall {
                token_in: token_in.clone(),
                token_out: token_out.clone(),
                amount_in,
                reply,
            })
            .map_err(|_| closed())?;
        await_reply(rx).await
    }
}

#[async_trait]
impl ChainSimulator for ScriptedContract {
    async fn simulate(&self, intent: &SwapIntent) -> Result<PreparedRequest, ChainError> {
        let (reply, rx) = oneshot::channel();
        self.simulations
            .send(SimulateCall {
                intent: intent.clone(),
                reply,
            })
            .map_err(|_| closed())?;
        await_reply(rx).await
    }
}

#[async_trait]
impl ChainWriter for ScriptedContract {
    async fn submit(&self, request: &PreparedRequest, from: Address) -> Result<TxReceipt, ChainError> {
        let (reply, rx) = oneshot::channel();
        self.submissions
            .send(SubmitCall {
                request: request.clone(),
                from,
                reply,
            })
            .map_err(|_| closed())?;
        await_reply(rx).await
    }
}

pub struct Harness {
    pub controller: SwapController,
    pub script: ContractScript,
    pub wallet: Arc<LocalWalletSession>,
    pub notifier: Arc<MemoryNotifier>,
    pub clock: ManualClock,
    pub account: Address,
    pub contract_address: Address,
}

pub fn test_tokens() -> TokenRegistry {
    TokenRegistry::new(vec![
        Token::new("eth", "Ether", 18),
        Token::new("usdt", "Tether USD", 18),
        Token::new("usdc", "USD Coin", 6),
    ])
}

/// Controller over a scripted contract with a connected wallet
pub fn harness() -> Harness {
    let (contract, script) = scripted_contract();
    let account = Address([0xa1; 20]);
    let wallet = Arc::new(LocalWalletSession::new(account, true));
    let notifier = Arc::new(MemoryNotifier::new());
    let clock = ManualClock::new(Utc.timestamp_opt(1_700_000_000, 0).unwrap());

    let deps = SwapDeps {
        contract: Arc::new(contract),
        wallet: wallet.clone(),
        notifier: notifier.clone(),
        clock: Arc::new(clock.clone()),
    };

    Harness {
        controller: SwapController::new(deps, test_tokens(), SwapSettings::default()),
        script,
        wallet,
        notifier,
        clock,
        account,
        contract_address: Address([0x5a; 20]),
    }
}
