//! Swap call arguments and the clock deadlines are taken from

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::shared::types::Token;

/// `deadline_secs` default: 30 minutes
pub const DEFAULT_DEADLINE_SECS: u64 = 1800;

/// Arguments of one simulate/submit attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapIntent {
    pub token_in: Token,
    pub token_out: Token,
    pub amount_in: u128,
    pub amount_out_min: u128,
    /// Unix seconds
    pub deadline: i64,
}

impl SwapIntent {
    pub fn new(
        token_in: Token,
        token_out: Token,
        amount_in: u128,
        amount_out_min: u128,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Self {
        Self {
            token_in,
            token_out,
            amount_in,
            amount_out_min,
            deadline: (now + window).timestamp(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.deadline
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_deadline_from_window() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let intent = SwapIntent::new(
            Token::new("eth", "Ether", 18),
            Token::new("usdt", "Tether USD", 18),
            1,
            1,
            now,
            Duration::seconds(DEFAULT_DEADLINE_SECS as i64),
        );
        assert_eq!(intent.deadline, 1_700_001_800);
        assert!(!intent.is_expired(now));
        assert!(intent.is_expired(now + Duration::seconds(1800)));
    }

    #[test]
    fn test_manual_clock_advances() {
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let clock = ManualClock::new(start);
        let shared = clock.clone();
        shared.advance(Duration::seconds(90));
        assert_eq!(clock.now(), start + Duration::seconds(90));
    }
}
