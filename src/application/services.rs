//! Application services - the swap widget wired to concrete collaborators

use std::sync::Arc;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::application::session::{SessionCommand, HELP};
use crate::domain::chain::{PreparedRequest, TxReceipt};
use crate::domain::notify::NotificationSink;
use crate::domain::swap::{
    Clock, SlippageSettings, SwapController, SwapDeps, SwapPhase, SwapSettings, SwapSnapshot,
    SystemClock,
};
use crate::domain::wallet::WalletSession;
use crate::infrastructure::{ConsoleNotifier, LocalWalletSession, MockSwapContract};
use crate::shared::config::{AppConfig, SwapConfig};
use crate::shared::errors::{AppError, ConfigError, SwapError};
use crate::shared::types::Address;

impl TryFrom<&SwapConfig> for SwapSettings {
    type Error = ConfigError;

    fn try_from(config: &SwapConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            slippage: SlippageSettings::new(config.slippage_bps),
            deadline_window: config.deadline_window()?,
        })
    }
}

/// Result of a one-shot swap
#[derive(Debug, Clone)]
pub enum SwapOutcome {
    /// Dry run only; nothing was sent
    Simulated(PreparedRequest),
    Submitted(TxReceipt),
    /// Submission was rejected; the notification carries the reason
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenListing {
    pub symbol: String,
    pub ticker: String,
    pub name: String,
    pub decimals: u8,
    pub price_usd: Option<f64>,
}

/// Owns one swap widget and the collaborators behind it
pub struct SwapService {
    controller: SwapController,
    contract: Arc<MockSwapContract>,
    wallet: Arc<LocalWalletSession>,
}

impl SwapService {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        Self::with_parts(config, Arc::new(ConsoleNotifier::new()), Arc::new(SystemClock))
    }

    pub fn with_parts(
        config: &AppConfig,
        notifier: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        let settings = SwapSettings::try_from(&config.swap)?;
        let contract = Arc::new(MockSwapContract::from_config(config, Arc::clone(&clock)));
        let wallet = Arc::new(LocalWalletSession::new(
            config.wallet.address,
            config.wallet.auto_connect,
        ));

        let deps = SwapDeps {
            contract: contract.clone(),
            wallet: wallet.clone(),
            notifier,
            clock,
        };
        let controller = SwapController::new(deps, config.token_registry(), settings);

        info!(
            "Swap widget on {} (chain id {}) against contract {}",
            config.network.chain.as_str(),
            config.network.chain.chain_id(),
            contract.address()
        );

        Ok(Self {
            controller,
            contract,
            wallet,
        })
    }

    pub fn controller(&self) -> &SwapController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SwapController {
        &mut self.controller
    }

    pub async fn connect_wallet(&self) -> Result<Address, AppError> {
        Ok(self.wallet.connect().await?)
    }

    /// Fill the form, wait for the quote and dry run, return the widget
    pub async fn quote(&mut self, from: &str, to: &str, amount: &str) -> Result<SwapSnapshot, AppError> {
        self.fill(from, to, amount)?;
        self.controller.settle().await;
        Ok(self.controller.snapshot())
    }

    /// Connect, quote, simulate, and submit unless `simulate_only`
    pub async fn swap(
        &mut self,
        from: &str,
        to: &str,
        amount: &str,
        simulate_only: bool,
    ) -> Result<SwapOutcome, AppError> {
        self.connect_wallet().await?;
        self.fill(from, to, amount)?;
        self.controller.settle().await;

        let prepared = self
            .controller
            .prepared_request()
            .cloned()
            .ok_or(SwapError::NotSimulated)?;
        if simulate_only {
            return Ok(SwapOutcome::Simulated(prepared));
        }

        self.controller.submit()?;
        self.controller.settle().await;

        match (self.controller.phase(), self.controller.last_receipt()) {
            (SwapPhase::Settled, Some(receipt)) => Ok(SwapOutcome::Submitted(receipt.clone())),
            _ => Ok(SwapOutcome::Failed),
        }
    }

    pub fn token_listing(&self) -> Vec<TokenListing> {
        self.controller
            .tokens()
            .tokens()
            .iter()
            .map(|token| TokenListing {
                symbol: token.symbol.clone(),
                ticker: token.ticker(),
                name: token.name.clone(),
                decimals: token.decimals,
                price_usd: self
                    .contract
                    .price_micro_usd(&token.symbol)
                    .map(|p| p as f64 / 1_000_000.0),
            })
            .collect()
    }

    /// Drive the widget from line commands until `quit` or end of input,
    /// applying controller events as they arrive.
    pub async fn run_interactive<R>(&mut self, input: R) -> Result<(), AppError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        println!("Type `help` for commands");
        self.print_status();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<SessionCommand>() {
                        Ok(SessionCommand::Quit) => break,
                        Ok(command) => {
                            if let Err(err) = self.apply(command).await {
                                println!("❌ {}", err);
                            }
                        }
                        Err(err) => println!("❌ {}", err),
                    }
                }
                Some(event) = self.controller.next_event() => {
                    let before = self.controller.phase();
                    self.controller.handle_event(event);
                    if self.controller.phase() != before {
                        self.print_status();
                    }
                }
            }
        }

        info!("Session closed");
        Ok(())
    }

    pub async fn apply(&mut self, command: SessionCommand) -> Result<(), AppError> {
        debug!("Session command {:?}", command);
        match command {
            SessionCommand::TokenIn(symbol) => self.controller.set_token_in(&symbol)?,
            SessionCommand::TokenOut(symbol) => self.controller.set_token_out(&symbol)?,
            SessionCommand::Amount(text) => self.controller.set_amount_in(&text)?,
            SessionCommand::Flip => self.controller.swap_direction(),
            SessionCommand::Connect => {
                let account = self.connect_wallet().await?;
                println!("🔗 Connected {}", account.short());
            }
            SessionCommand::Disconnect => {
                self.wallet.disconnect().await;
                println!("🔌 Disconnected");
            }
            SessionCommand::Submit => self.controller.submit()?,
            SessionCommand::Status => self.print_status(),
            SessionCommand::Help => {
                for line in HELP {
                    println!("  {}", line);
                }
            }
            SessionCommand::Quit => {}
        }
        Ok(())
    }

    pub fn print_status(&self) {
        for line in self.controller.snapshot().render() {
            println!("{}", line);
        }
    }

    fn fill(&mut self, from: &str, to: &str, amount: &str) -> Result<(), SwapError> {
        self.controller.set_token_in(from)?;
        self.controller.set_token_out(to)?;
        self.controller.set_amount_in(amount)
    }
}
