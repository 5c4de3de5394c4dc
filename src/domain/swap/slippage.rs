//! Slippage protection

use serde::{Deserialize, Serialize};

use crate::shared::utils::bps_to_percent_str;

const BPS_DENOMINATOR: u128 = 10_000;

/// Maximum accepted adverse deviation from the quoted output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlippageSettings {
    pub tolerance_bps: u32,
}

impl Default for SlippageSettings {
    /// 0.5%
    fn default() -> Self {
        Self { tolerance_bps: 50 }
    }
}

impl SlippageSettings {
    pub fn new(tolerance_bps: u32) -> Self {
        Self {
            tolerance_bps: tolerance_bps.min(BPS_DENOMINATOR as u32),
        }
    }

    /// `amount_out * (1 - tolerance)`, rounded down
    pub fn min_amount_out(&self, amount_out: u128) -> u128 {
        let keep = BPS_DENOMINATOR - self.tolerance_bps as u128;
        // split to keep the multiplication inside u128
        let whole = amount_out / BPS_DENOMINATOR * keep;
        let rest = amount_out % BPS_DENOMINATOR * keep / BPS_DENOMINATOR;
        whole + rest
    }

    pub fn percent_str(&self) -> String {
        bps_to_percent_str(self.tolerance_bps)
    }
}
