//! Safe financial arithmetic using fixed-point decimal
//!
//! This module provides a type-safe Amount type using rust_decimal.
//! **NEVER use f64 for financial calculations!**
//!
//! # Security
//!
//! - Uses `Decimal` internally (28-29 significant digits)
//! - All arithmetic is exact (no rounding errors)
//! - Serializes as string (preserves precision)

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Monetary amount with fixed-point precision
///
/// # Examples
///
/// ```rust
/// use renewal_proration::Amount;
/// use rust_decimal_macros::dec;
///
/// let price = Amount::new(dec!(30.00));
/// assert!(price.is_positive());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount {
    // Decimal automatically serializes as string with serde feature
    value: Decimal,
}

impl Amount {
    /// Create from a Decimal value
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Create from decimal string (e.g., "123.45")
    ///
    /// # Errors
    ///
    /// Returns an error if the string cannot be parsed as a valid decimal.
    pub fn from_str_checked(s: &str) -> Result<Self, String> {
        Decimal::from_str(s)
            .map(|value| Self { value })
            .map_err(|e| format!("Invalid amount: {}", e))
    }

    /// Get zero amount
    pub fn zero() -> Self {
        Self {
            value: Decimal::ZERO,
        }
    }

    /// Check if amount is zero
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Check if amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.value > Decimal::ZERO
    }

    /// Get the internal Decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Round half-up to `decimals` decimal places
    ///
    /// Half-up here means midpoints round away from zero, matching how
    /// storefront currency configurations round displayed prices.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use renewal_proration::Amount;
    /// use rust_decimal_macros::dec;
    ///
    /// let amt = Amount::new(dec!(9.855));
    /// assert_eq!(amt.round_to(2), Amount::new(dec!(9.86)));
    /// ```
    pub fn round_to(&self, decimals: u32) -> Self {
        Self {
            value: self
                .value
                .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero),
        }
    }

    /// Clamp to an upper bound
    ///
    /// Returns the smaller of the two amounts.
    pub fn clamp_to(&self, max: &Self) -> Self {
        if self.value > max.value {
            *max
        } else {
            *self
        }
    }

    /// Render at a fixed number of decimal places (e.g., "30.00")
    ///
    /// Used for cache keys, where the same price must always produce the
    /// same key regardless of how many trailing zeros the caller supplied.
    pub fn to_precision_string(&self, decimals: u32) -> String {
        format!("{:.*}", decimals as usize, self.round_to(decimals).value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl FromStr for Amount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_checked(s)
    }
}
