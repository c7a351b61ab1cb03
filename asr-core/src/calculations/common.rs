//! Shared helpers for salary request calculations.
//!
//! Parsing of raw currency input and financial rounding live here so every
//! calculator treats a form value the same way.

use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a currency string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid amount '{input}': {reason}")]
pub struct ParseAmountError {
    pub input: String,
    pub reason: String,
}

/// Trims whitespace and drops thousands separators.
fn normalize_amount_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a raw currency value.
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`). Empty or
/// whitespace-only input is treated as 0, matching an untouched field.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use asr_core::calculations::common::parse_amount;
///
/// assert_eq!(parse_amount("1,234.56"), Ok(dec!(1234.56)));
/// assert_eq!(parse_amount(""), Ok(dec!(0)));
/// assert!(parse_amount("abc").is_err());
/// ```
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized
        .parse::<Decimal>()
        .map_err(|e: rust_decimal::Error| ParseAmountError {
            input: s.to_string(),
            reason: e.to_string(),
        })
}

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use asr_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // parse_amount tests
    // =========================================================================

    #[test]
    fn parse_amount_accepts_thousands_separators() {
        assert_eq!(parse_amount("1,234,567.89"), Ok(dec!(1234567.89)));
    }

    #[test]
    fn parse_amount_trims_whitespace() {
        assert_eq!(parse_amount("  250.50 "), Ok(dec!(250.50)));
    }

    #[test]
    fn parse_amount_treats_blank_as_zero() {
        assert_eq!(parse_amount(""), Ok(Decimal::ZERO));
        assert_eq!(parse_amount("   "), Ok(Decimal::ZERO));
    }

    #[test]
    fn parse_amount_keeps_negative_values() {
        assert_eq!(parse_amount("-10"), Ok(dec!(-10)));
    }

    #[test]
    fn parse_amount_rejects_text() {
        let err = parse_amount("abc").unwrap_err();

        assert_eq!(err.input, "abc");
    }

    // =========================================================================
    // round_half_up / max tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_midpoint_away_from_zero() {
        assert_eq!(round_half_up(dec!(0.125)), dec!(0.13));
        assert_eq!(round_half_up(dec!(-0.125)), dec!(-0.13));
    }

    #[test]
    fn round_half_up_keeps_already_rounded_values() {
        assert_eq!(round_half_up(dec!(1200.00)), dec!(1200.00));
    }

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(-5), dec!(0)), dec!(0));
        assert_eq!(max(dec!(7), dec!(3)), dec!(7));
    }
}
