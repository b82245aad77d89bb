//! Fixed-point monetary amount type.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All monetary values are `rust_decimal::Decimal` at scale 2, at most 15
//! total digits, combined under a single process-wide policy: exact
//! fixed-point arithmetic, round-half-up wherever a value is rescaled.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum total digits for a monetary value (matches `DECIMAL(15,2)` columns).
pub const MAX_TOTAL_DIGITS: u32 = 15;

/// Fixed decimal scale for all monetary values.
pub const SCALE: u32 = 2;

/// Errors produced when parsing a monetary amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The input is not a valid decimal number.
    #[error("a valid number is required")]
    InvalidFormat,

    /// The amount is zero or negative.
    #[error("amount must be greater than zero")]
    NotPositive,

    /// The amount carries more than two decimal places.
    #[error("amount cannot have more than {SCALE} decimal places")]
    TooManyDecimalPlaces,

    /// The amount exceeds 15 total digits.
    #[error("amount cannot have more than {MAX_TOTAL_DIGITS} digits in total")]
    TooManyDigits,
}

/// A validated, positive monetary amount at scale 2.
///
/// `Amount` can only be constructed through [`Amount::parse`], so any
/// `Amount` reaching the arithmetic or storage layers already satisfies the
/// `amount > 0` invariant with the persisted precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Parses a decimal string into a positive amount.
    ///
    /// Rejects non-numeric input, more than two decimal places, more than
    /// 15 total digits, and non-positive values. Accepted values are
    /// rescaled to exactly two decimal places.
    ///
    /// # Errors
    ///
    /// Returns an [`AmountError`] naming the violated constraint.
    pub fn parse(input: &str) -> Result<Self, AmountError> {
        let value =
            Decimal::from_str_exact(input.trim()).map_err(|_| AmountError::InvalidFormat)?;

        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive);
        }
        if value.scale() > SCALE {
            return Err(AmountError::TooManyDecimalPlaces);
        }
        if value > max_value() {
            return Err(AmountError::TooManyDigits);
        }

        let mut value = value;
        value.rescale(SCALE);
        Ok(Self(value))
    }

    /// Returns the inner decimal value.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Largest value representable in `DECIMAL(15,2)`: 9999999999999.99.
fn max_value() -> Decimal {
    Decimal::new(999_999_999_999_999, SCALE)
}

/// Formats a stored balance at exactly two decimal places, round-half-up.
///
/// Balances produced by the ledger already carry scale 2; this normalizes
/// values arriving with a different scale (e.g. a raw `0` default).
#[must_use]
pub fn format_balance(balance: Decimal) -> String {
    let mut normalized =
        balance.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    normalized.rescale(SCALE);
    normalized.to_string()
}
