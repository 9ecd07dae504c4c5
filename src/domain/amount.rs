//! Amount type
//!
//! Domain primitive for the integer quantities typed into chat commands.
//! Amounts are validated at parse time, so handlers never see a negative
//! or non-numeric stake.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Amount represents a validated, non-negative number of currency units.
///
/// # Invariants
/// - Value is always zero or positive
/// - Parsed only from plain ASCII digits (no sign, no separators)
///
/// # Example
/// ```
/// use chat_economy::domain::Amount;
///
/// let amount: Amount = "250".parse().unwrap();
/// assert_eq!(amount.value(), 250);
/// assert!("-5".parse::<Amount>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Amount(i64);

/// Errors that can occur when creating an Amount
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount must not be negative (got {0})")]
    Negative(i64),

    #[error("Amount is empty")]
    Empty,

    #[error("Amount must contain only digits: {0}")]
    NotDigits(String),

    #[error("Amount is too large")]
    Overflow,
}

impl Amount {
    /// Create a new Amount with validation.
    pub fn new(value: i64) -> Result<Self, AmountError> {
        if value < 0 {
            return Err(AmountError::Negative(value));
        }
        Ok(Self(value))
    }

    /// Get the underlying value.
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiply, reporting overflow instead of wrapping.
    pub fn checked_mul(&self, factor: i64) -> Result<Amount, AmountError> {
        self.0
            .checked_mul(factor)
            .ok_or(AmountError::Overflow)
            .and_then(Amount::new)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(AmountError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::NotDigits(s.to_string()));
        }
        let value: i64 = s.parse().map_err(|_| AmountError::Overflow)?;
        Amount::new(value)
    }
}

impl TryFrom<i64> for Amount {
    type Error = AmountError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for i64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}
