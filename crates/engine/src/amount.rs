//! Decimal amount parsing and encoding.
//!
//! Amounts arrive as raw form strings and are persisted as canonical decimal
//! text; SQLite has no decimal column type and floats are not acceptable for
//! money.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::{EngineError, ResultEngine};

/// Parses a raw decimal string, any sign.
pub(crate) fn parse_decimal(raw: &str) -> ResultEngine<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(
            "amount must not be empty".to_string(),
        ));
    }
    Decimal::from_str(trimmed)
        .map_err(|_| EngineError::InvalidAmount(format!("not a decimal number: {trimmed}")))
}

/// Parses an expense amount: a decimal, zero or greater.
pub(crate) fn parse(raw: &str) -> ResultEngine<Decimal> {
    let amount = parse_decimal(raw)?;
    if amount < Decimal::ZERO {
        return Err(EngineError::InvalidAmount(
            "amount must not be negative".to_string(),
        ));
    }
    Ok(amount)
}

/// Parses a stored amount, treating anything unreadable as zero.
///
/// Rows written before validation existed may hold junk; aggregation must
/// never fail on them.
pub(crate) fn parse_lossy(raw: &str) -> Decimal {
    Decimal::from_str(raw.trim()).unwrap_or(Decimal::ZERO)
}

/// Canonical storage/display form: no trailing zeros, no exponent.
pub(crate) fn encode(amount: Decimal) -> String {
    amount.normalize().to_string()
}
