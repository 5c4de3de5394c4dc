//! Swap widget state

use serde::Serialize;

use crate::shared::types::Token;
use super::request::Generation;

/// User-entered form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapForm {
    pub token_in: Option<Token>,
    pub token_out: Option<Token>,
    /// Amount exactly as typed; validated numeric or empty
    pub amount_in: String,
}

impl SwapForm {
    /// All three fields present
    pub fn is_complete(&self) -> bool {
        self.token_in.is_some() && self.token_out.is_some() && !self.amount_in.is_empty()
    }

    pub fn has_identical_tokens(&self) -> bool {
        match (&self.token_in, &self.token_out) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapPhase {
    Idle,
    Quoting,
    Quoted,
    Simulating,
    Simulated,
    Submitting,
    Settled,
    Failed,
}

impl SwapPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapPhase::Idle => "idle",
            SwapPhase::Quoting => "quoting",
            SwapPhase::Quoted => "quoted",
            SwapPhase::Simulating => "simulating",
            SwapPhase::Simulated => "simulated",
            SwapPhase::Submitting => "submitting",
            SwapPhase::Settled => "settled",
            SwapPhase::Failed => "failed",
        }
    }
}

/// Controller counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SwapStats {
    pub quotes_requested: u64,
    pub quotes_resolved: u64,
    pub quotes_failed: u64,
    pub min_out_derivations: u64,
    pub simulations_requested: u64,
    pub simulations_succeeded: u64,
    pub simulations_failed: u64,
    pub submissions: u64,
    pub submissions_failed: u64,
    pub stale_responses_discarded: u64,
}

/// Display model of the widget
#[derive(Debug, Clone, Serialize)]
pub struct SwapSnapshot {
    pub generation: Generation,
    pub token_in: Option<String>,
    pub token_out: Option<String>,
    pub amount_in: String,
    pub amount_out: Option<String>,
    pub amount_out_min: Option<String>,
    /// Output per one unit of input
    pub rate: Option<f64>,
    pub slippage: String,
    pub phase: SwapPhase,
    pub connected: bool,
    pub ready: bool,
    pub submit_label: &'static str,
}

impl SwapSnapshot {
    /// Widget rendered as text lines
    pub fn render(&self) -> Vec<String> {
        let dash = || "-".to_string();
        let token_in = self.token_in.clone().unwrap_or_else(dash);
        let token_out = self.token_out.clone().unwrap_or_else(dash);
        let amount_in = if self.amount_in.is_empty() {
            dash()
        } else {
            self.amount_in.clone()
        };
        let rate = self
            .rate
            .map(|r| format!("1 {} = {} {}", token_in, r, token_out))
            .unwrap_or_else(dash);

        vec![
            format!("From:       {} {}", amount_in, token_in),
            format!(
                "To:         {} {}",
                self.amount_out.clone().unwrap_or_else(dash),
                token_out
            ),
            format!("Minimum:    {}", self.amount_out_min.clone().unwrap_or_else(dash)),
            format!("Rate:       {}", rate),
            format!("Slippage:   {}", self.slippage),
            format!("State:      {} ({})", self.phase.as_str(), self.generation),
            format!(
                "[ {} ]{}",
                self.submit_label,
                if self.ready { "" } else { " (disabled)" }
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_completeness() {
        let mut form = SwapForm::default();
        assert!(!form.is_complete());
        form.token_in = Some(Token::new("eth", "Ether", 18));
        form.token_out = Some(Token::new("usdt", "Tether USD", 18));
        assert!(!form.is_complete());
        form.amount_in = "1".to_string();
        assert!(form.is_complete());
        assert!(!form.has_identical_tokens());
        form.token_out = form.token_in.clone();
        assert!(form.has_identical_tokens());
    }

    #[test]
    fn test_render_disabled_button() {
        let snapshot = SwapSnapshot {
            generation: Generation::default(),
            token_in: Some("ETH".to_string()),
            token_out: None,
            amount_in: String::new(),
            amount_out: None,
            amount_out_min: None,
            rate: None,
            slippage: "0.5%".to_string(),
            phase: SwapPhase::Idle,
            connected: false,
            ready: false,
            submit_label: "Connect Wallet",
        };
        let lines = snapshot.render();
        assert_eq!(lines[0], "From:       - ETH");
        assert_eq!(lines.last().unwrap(), "[ Connect Wallet ] (disabled)");
    }
}
