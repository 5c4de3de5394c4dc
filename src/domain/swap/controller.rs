//! Swap widget controller
//!
//! Keeps the quoted output and the slippage-protected minimum output in
//! step with the form, and gates submission on wallet connection and a
//! successful dry run. External calls run as spawned tasks that report back
//! over a channel; the owner drains that channel on its event loop with
//! [`SwapController::next_event`] + [`SwapController::handle_event`] (or
//! [`SwapController::settle`]). Every quote and simulation is tagged with the
//! [`Generation`] of the form it was derived from, and results for any other
//! generation are dropped.

use std::sync::Arc;

use chrono::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::chain::{PreparedRequest, SwapContract, TxReceipt};
use crate::domain::notify::{Notification, NotificationSink};
use crate::domain::wallet::{ConnectionState, WalletSession};
use crate::shared::errors::{ChainError, SwapError};
use crate::shared::types::{Token, TokenRegistry};
use crate::shared::utils::{format_units, is_decimal_text, parse_units};
use super::intent::{Clock, SwapIntent, DEFAULT_DEADLINE_SECS};
use super::request::{Generation, RequestSlot};
use super::slippage::SlippageSettings;
use super::state::{SwapForm, SwapPhase, SwapSnapshot, SwapStats};

pub const LABEL_CONNECT: &str = "Connect Wallet";
pub const LABEL_SWAPPING: &str = "Swapping...";
pub const LABEL_SWAP: &str = "Swap";

/// Injected collaborators
#[derive(Clone)]
pub struct SwapDeps {
    pub contract: Arc<dyn SwapContract>,
    pub wallet: Arc<dyn WalletSession>,
    pub notifier: Arc<dyn NotificationSink>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Debug, Clone, Copy)]
pub struct SwapSettings {
    pub slippage: SlippageSettings,
    pub deadline_window: Duration,
}

impl Default for SwapSettings {
    fn default() -> Self {
        Self {
            slippage: SlippageSettings::default(),
            deadline_window: Duration::seconds(DEFAULT_DEADLINE_SECS as i64),
        }
    }
}

/// Quote arguments derived from one complete form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub generation: Generation,
    pub token_in: Token,
    pub token_out: Token,
    pub amount_in: u128,
}

/// Results posted back by spawned requests
#[derive(Debug)]
pub enum ControllerEvent {
    QuoteResolved {
        generation: Generation,
        result: Result<u128, ChainError>,
    },
    SimulationResolved {
        generation: Generation,
        result: Result<PreparedRequest, ChainError>,
    },
    SubmissionSettled {
        submission: u64,
        result: Result<TxReceipt, ChainError>,
    },
}

/// Input setters and `submit` spawn tokio tasks, so the controller must be
/// driven from inside a tokio runtime.
pub struct SwapController {
    deps: SwapDeps,
    tokens: TokenRegistry,
    settings: SwapSettings,

    form: SwapForm,
    generation: Generation,
    quote_args: Option<QuoteRequest>,
    amount_out: Option<u128>,
    amount_out_min: Option<u128>,
    prepared: Option<PreparedRequest>,
    phase: SwapPhase,

    quote: RequestSlot,
    simulation: RequestSlot,
    submission: Option<u64>,
    submission_seq: u64,
    last_receipt: Option<TxReceipt>,

    events_tx: mpsc::UnboundedSender<ControllerEvent>,
    events_rx: mpsc::UnboundedReceiver<ControllerEvent>,
    stats: SwapStats,
}

impl SwapController {
    pub fn new(deps: SwapDeps, tokens: TokenRegistry, settings: SwapSettings) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            deps,
            tokens,
            settings,
            form: SwapForm::default(),
            generation: Generation::default(),
            quote_args: None,
            amount_out: None,
            amount_out_min: None,
            prepared: None,
            phase: SwapPhase::Idle,
            quote: RequestSlot::new("quote"),
            simulation: RequestSlot::new("simulation"),
            submission: None,
            submission_seq: 0,
            last_receipt: None,
            events_tx,
            events_rx,
            stats: SwapStats::default(),
        }
    }

    pub fn set_token_in(&mut self, symbol: &str) -> Result<(), SwapError> {
        let token = self.lookup(symbol)?;
        if self.form.token_in.as_ref() == Some(&token) {
            return Ok(());
        }
        self.form.token_in = Some(token);
        self.on_input_changed();
        Ok(())
    }

    pub fn set_token_out(&mut self, symbol: &str) -> Result<(), SwapError> {
        let token = self.lookup(symbol)?;
        if self.form.token_out.as_ref() == Some(&token) {
            return Ok(());
        }
        self.form.token_out = Some(token);
        self.on_input_changed();
        Ok(())
    }

    /// Accepts non-negative decimal text; empty text clears the amount
    pub fn set_amount_in(&mut self, text: &str) -> Result<(), SwapError> {
        let text = text.trim();
        if !text.is_empty() && !is_decimal_text(text) {
            warn!("Rejected non-numeric amount {:?}", text);
            return Err(SwapError::InvalidAmount(text.to_string()));
        }
        if self.form.amount_in == text {
            return Ok(());
        }
        self.form.amount_in = text.to_string();
        self.on_input_changed();
        Ok(())
    }

    /// Exchange the selected tokens; the amount stays where it is
    pub fn swap_direction(&mut self) {
        if self.form.token_in == self.form.token_out {
            return;
        }
        let form = &mut self.form;
        std::mem::swap(&mut form.token_in, &mut form.token_out);
        self.on_input_changed();
    }

    /// Quote arguments for the current form, `None` while incomplete
    pub fn quote_request(&self) -> Result<Option<QuoteRequest>, SwapError> {
        let (Some(token_in), Some(token_out)) = (&self.form.token_in, &self.form.token_out) else {
            return Ok(None);
        };
        if self.form.amount_in.is_empty() {
            return Ok(None);
        }
        let amount_in = parse_units(&self.form.amount_in, token_in.decimals)?;
        Ok(Some(QuoteRequest {
            generation: self.generation,
            token_in: token_in.clone(),
            token_out: token_out.clone(),
            amount_in,
        }))
    }

    /// Forward the simulated request to the write interface
    pub fn submit(&mut self) -> Result<(), SwapError> {
        let account = self
            .deps
            .wallet
            .connection()
            .account()
            .ok_or(SwapError::WalletDisconnected)?;
        if self.submission.is_some() {
            return Err(SwapError::SubmissionInFlight);
        }
        let request = self.prepared.clone().ok_or(SwapError::NotSimulated)?;

        self.submission_seq += 1;
        let submission = self.submission_seq;
        let contract = Arc::clone(&self.deps.contract);
        let tx = self.events_tx.clone();

        info!(
            "Submitting swap {} {} -> {} (request {})",
            format_units(request.intent.amount_in, request.intent.token_in.decimals),
            request.intent.token_in.ticker(),
            request.intent.token_out.ticker(),
            request.id
        );

        // never aborted: the write is irreversible once the network has it
        tokio::spawn(async move {
            let result = contract.submit(&request, account).await;
            let _ = tx.send(ControllerEvent::SubmissionSettled { submission, result });
        });

        self.submission = Some(submission);
        self.stats.submissions += 1;
        self.phase = SwapPhase::Submitting;
        Ok(())
    }

    pub fn handle_event(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::QuoteResolved { generation, result } => {
                self.on_quote_resolved(generation, result)
            }
            ControllerEvent::SimulationResolved { generation, result } => {
                self.on_simulation_resolved(generation, result)
            }
            ControllerEvent::SubmissionSettled { submission, result } => {
                self.on_submission_settled(submission, result)
            }
        }
    }

    pub async fn next_event(&mut self) -> Option<ControllerEvent> {
        self.events_rx.recv().await
    }

    /// Wait for one event and apply it
    pub async fn process_next_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Apply events until nothing is in flight
    pub async fn settle(&mut self) {
        while self.has_pending_work() {
            if !self.process_next_event().await {
                break;
            }
        }
    }

    pub fn has_pending_work(&self) -> bool {
        self.quote.is_pending() || self.simulation.is_pending() || self.submission.is_some()
    }

    /// Connected, simulated, and not already submitting
    pub fn is_ready(&self) -> bool {
        self.connection().is_connected() && self.prepared.is_some() && self.submission.is_none()
    }

    pub fn submit_label(&self) -> &'static str {
        if !self.connection().is_connected() {
            LABEL_CONNECT
        } else if self.submission.is_some() {
            LABEL_SWAPPING
        } else {
            LABEL_SWAP
        }
    }

    /// Output per one whole unit of input, from the current quote
    pub fn rate(&self) -> Option<f64> {
        let args = self.quote_args.as_ref()?;
        let amount_out = self.amount_out?;
        if args.amount_in == 0 {
            return None;
        }
        let amount_in = args.amount_in as f64 / 10f64.powi(args.token_in.decimals as i32);
        let amount_out = amount_out as f64 / 10f64.powi(args.token_out.decimals as i32);
        Some(amount_out / amount_in)
    }

    pub fn snapshot(&self) -> SwapSnapshot {
        let decimals_out = self.form.token_out.as_ref().map(|t| t.decimals).unwrap_or(18);
        SwapSnapshot {
            generation: self.generation,
            token_in: self.form.token_in.as_ref().map(Token::ticker),
            token_out: self.form.token_out.as_ref().map(Token::ticker),
            amount_in: self.form.amount_in.clone(),
            amount_out: self.amount_out.map(|a| format_units(a, decimals_out)),
            amount_out_min: self.amount_out_min.map(|a| format_units(a, decimals_out)),
            rate: self.rate(),
            slippage: self.settings.slippage.percent_str(),
            phase: self.phase,
            connected: self.connection().is_connected(),
            ready: self.is_ready(),
            submit_label: self.submit_label(),
        }
    }

    pub fn connection(&self) -> ConnectionState {
        self.deps.wallet.connection()
    }

    pub fn form(&self) -> &SwapForm {
        &self.form
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn phase(&self) -> SwapPhase {
        self.phase
    }

    pub fn amount_out(&self) -> Option<u128> {
        self.amount_out
    }

    pub fn amount_out_min(&self) -> Option<u128> {
        self.amount_out_min
    }

    pub fn prepared_request(&self) -> Option<&PreparedRequest> {
        self.prepared.as_ref()
    }

    pub fn last_receipt(&self) -> Option<&TxReceipt> {
        self.last_receipt.as_ref()
    }

    pub fn stats(&self) -> &SwapStats {
        &self.stats
    }

    pub fn tokens(&self) -> &TokenRegistry {
        &self.tokens
    }

    fn lookup(&self, symbol: &str) -> Result<Token, SwapError> {
        self.tokens
            .get(symbol)
            .cloned()
            .ok_or_else(|| SwapError::UnknownToken(symbol.to_string()))
    }

    fn notify(&self, notification: Notification) {
        self.deps.notifier.notify(notification);
    }

    /// New form state: supersede everything derived from the old one
    fn on_input_changed(&mut self) {
        self.generation = self.generation.next();
        self.quote.cancel();
        self.simulation.cancel();
        self.quote_args = None;
        self.amount_out = None;
        self.amount_out_min = None;
        self.prepared = None;

        if let Err(err) = self.request_quote() {
            warn!("Quote not requested for {}: {}", self.generation, err);
            self.notify(Notification::error(err.to_string()));
        }
    }

    fn request_quote(&mut self) -> Result<(), SwapError> {
        self.phase = SwapPhase::Idle;
        let Some(request) = self.quote_request()? else {
            return Ok(());
        };

        if self.form.has_identical_tokens() {
            warn!("Quoting identical pair {}/{}", request.token_in.ticker(), request.token_out.ticker());
        }

        let generation = request.generation;
        let contract = Arc::clone(&self.deps.contract);
        let tx = self.events_tx.clone();
        let args = request.clone();
        let handle = tokio::spawn(async move {
            let result = contract
                .get_amount_out(&args.token_in, &args.token_out, args.amount_in)
                .await;
            let _ = tx.send(ControllerEvent::QuoteResolved { generation, result });
        });

        self.quote.start(generation, handle);
        self.quote_args = Some(request);
        self.stats.quotes_requested += 1;
        self.phase = SwapPhase::Quoting;
        Ok(())
    }

    fn request_simulation(&mut self) {
        let (Some(args), Some(amount_out_min)) = (&self.quote_args, self.amount_out_min) else {
            return;
        };

        let intent = SwapIntent::new(
            args.token_in.clone(),
            args.token_out.clone(),
            args.amount_in,
            amount_out_min,
            self.deps.clock.now(),
            self.settings.deadline_window,
        );

        let generation = self.generation;
        let contract = Arc::clone(&self.deps.contract);
        let tx = self.events_tx.clone();
        let handle = tokio::spawn(async move {
            let result = contract.simulate(&intent).await;
            let _ = tx.send(ControllerEvent::SimulationResolved { generation, result });
        });

        self.simulation.start(generation, handle);
        self.stats.simulations_requested += 1;
        self.phase = SwapPhase::Simulating;
    }

    fn discard_stale(&mut self, kind: &str, generation: Generation) {
        self.stats.stale_responses_discarded += 1;
        debug!(
            "Discarded stale {} response for {} (current {})",
            kind, generation, self.generation
        );
    }

    fn on_quote_resolved(&mut self, generation: Generation, result: Result<u128, ChainError>) {
        if generation != self.generation || !self.quote.complete(generation) {
            self.discard_stale("quote", generation);
            return;
        }

        match result {
            Ok(amount_out) => {
                let amount_out_min = self.settings.slippage.min_amount_out(amount_out);
                self.amount_out = Some(amount_out);
                self.amount_out_min = Some(amount_out_min);
                self.stats.quotes_resolved += 1;
                self.stats.min_out_derivations += 1;
                self.phase = SwapPhase::Quoted;
                debug!(
                    "Quote {}: out {} min {}",
                    generation, amount_out, amount_out_min
                );
                self.request_simulation();
            }
            Err(err) => {
                self.stats.quotes_failed += 1;
                self.phase = SwapPhase::Idle;
                warn!("Quote {} failed: {}", generation, err);
                self.notify(Notification::error(format!("Could not fetch a quote: {}", err)));
            }
        }
    }

    fn on_simulation_resolved(
        &mut self,
        generation: Generation,
        result: Result<PreparedRequest, ChainError>,
    ) {
        if generation != self.generation || !self.simulation.complete(generation) {
            self.discard_stale("simulation", generation);
            return;
        }

        match result {
            Ok(prepared) => {
                debug!("Simulation {} ok, request {}", generation, prepared.id);
                self.prepared = Some(prepared);
                self.stats.simulations_succeeded += 1;
                self.phase = SwapPhase::Simulated;
            }
            Err(err) => {
                self.stats.simulations_failed += 1;
                self.phase = SwapPhase::Quoted;
                warn!("Simulation {} failed: {}", generation, err);
                self.notify(Notification::error(format!("Swap simulation failed: {}", err)));
            }
        }
    }

    fn on_submission_settled(&mut self, submission: u64, result: Result<TxReceipt, ChainError>) {
        if self.submission != Some(submission) {
            self.stats.stale_responses_discarded += 1;
            debug!("Ignoring settlement of unknown submission {}", submission);
            return;
        }
        self.submission = None;

        // the form may have moved on while the swap was in flight
        let still_current = self.phase == SwapPhase::Submitting;

        match result {
            Ok(receipt) => {
                info!("Swap submitted: {}", receipt.hash);
                self.last_receipt = Some(receipt);
                if still_current {
                    self.phase = SwapPhase::Settled;
                }
                self.notify(Notification::success("Swap successful!"));
            }
            Err(err) => {
                self.stats.submissions_failed += 1;
                if still_current {
                    self.phase = SwapPhase::Failed;
                }
                warn!("Swap submission {} failed: {}", submission, err);
                self.notify(Notification::error("Swap failed. Please try again."));
            }
        }
    }
}
