use rust_decimal::Decimal;
use std::str::FromStr;

use crate::constants::MONEY_UNIT_SCALE;

/// Parses a monetary string into a fixed-point amount.
///
/// Lenient by contract: empty, whitespace-only or non-numeric input yields
/// `Decimal::ZERO` rather than an error. Thousands separators are tolerated.
pub fn parse_amount_str(input: &str) -> Decimal {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }

    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&cleaned).unwrap_or(Decimal::ZERO)
}

/// Optional-input variant of [`parse_amount_str`]; `None` yields zero.
pub fn parse_amount<S: AsRef<str>>(input: Option<S>) -> Decimal {
    match input {
        Some(s) => parse_amount_str(s.as_ref()),
        None => Decimal::ZERO,
    }
}

/// Renders an amount as a decimal string with no precision loss.
///
/// Trailing zeros are stripped so the same value always renders the same way;
/// the paid-amount compare-and-swap relies on a stable round-trip.
pub fn format_amount(amount: Decimal) -> String {
    amount.normalize().to_string()
}

/// Floors an amount to the smallest currency unit.
pub fn floor_to_unit(amount: Decimal) -> Decimal {
    amount.trunc_with_scale(MONEY_UNIT_SCALE)
}
