//! Utility functions and helpers

use crate::shared::errors::SwapError;

/// Whether `text` is a non-negative decimal: digits with at most one `.`
/// and at least one digit overall.
pub fn is_decimal_text(text: &str) -> bool {
    let mut seen_dot = false;
    let mut seen_digit = false;
    for c in text.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}

/// Convert decimal text into raw smallest units (`parse_units("1.5", 18)`)
pub fn parse_units(text: &str, decimals: u8) -> Result<u128, SwapError> {
    let text = text.trim();
    if !is_decimal_text(text) {
        return Err(SwapError::InvalidAmount(text.to_string()));
    }

    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, f.trim_end_matches('0')),
        None => (text, ""),
    };

    if fraction.len() > decimals as usize {
        return Err(SwapError::AmountPrecision {
            amount: text.to_string(),
            decimals,
        });
    }

    let overflow = || SwapError::InvalidAmount(text.to_string());
    let scale = 10u128.checked_pow(decimals as u32).ok_or_else(overflow)?;

    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| overflow())?
    };

    let fraction_raw: u128 = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", fraction, width = decimals as usize);
        padded.parse().map_err(|_| overflow())?
    };

    whole
        .checked_mul(scale)
        .and_then(|w| w.checked_add(fraction_raw))
        .ok_or_else(overflow)
}

/// Format raw smallest units as trimmed decimal text (`1890.5`)
pub fn format_units(raw: u128, decimals: u8) -> String {
    if decimals == 0 {
        return raw.to_string();
    }
    let scale = 10u128.pow(decimals as u32);
    let whole = raw / scale;
    let fraction = raw % scale;
    if fraction == 0 {
        return whole.to_string();
    }
    let fraction = format!("{:0>width$}", fraction, width = decimals as usize);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

/// Basis points as a percentage string (`50` -> `0.5%`)
pub fn bps_to_percent_str(bps: u32) -> String {
    let percent = bps as f64 / 100.0;
    format!("{}%", percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ETHER: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn test_decimal_text() {
        assert!(is_decimal_text("1"));
        assert!(is_decimal_text("0.5"));
        assert!(is_decimal_text(".5"));
        assert!(is_decimal_text("2."));
        assert!(!is_decimal_text(""));
        assert!(!is_decimal_text("."));
        assert!(!is_decimal_text("-1"));
        assert!(!is_decimal_text("1e5"));
        assert!(!is_decimal_text("1.2.3"));
        assert!(!is_decimal_text("abc"));
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_units("1", 18).unwrap(), ETHER);
        assert_eq!(parse_units("1.5", 18).unwrap(), ETHER + ETHER / 2);
        assert_eq!(parse_units(".25", 6).unwrap(), 250_000);
        assert_eq!(parse_units("0", 18).unwrap(), 0);
        assert_eq!(parse_units("1.10", 1).unwrap(), 11);
    }

    #[test]
    fn test_parse_units_rejects_excess_precision() {
        let err = parse_units("0.0000001", 6).unwrap_err();
        assert_eq!(
            err,
            SwapError::AmountPrecision {
                amount: "0.0000001".to_string(),
                decimals: 6
            }
        );
    }

    #[test]
    fn test_parse_units_rejects_overflow() {
        let huge = "9".repeat(40);
        assert!(parse_units(&huge, 18).is_err());
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(1890 * ETHER + ETHER / 2, 18), "1890.5");
        assert_eq!(format_units(1900 * ETHER, 18), "1900");
        assert_eq!(format_units(1, 6), "0.000001");
        assert_eq!(format_units(42, 0), "42");
    }

    #[test]
    fn test_bps_to_percent_str() {
        assert_eq!(bps_to_percent_str(50), "0.5%");
        assert_eq!(bps_to_percent_str(100), "1%");
    }
}
