//! First-cycle proration
//!
//! Computes the fraction of the regular price due today when a
//! subscription's first renewal lands partway into a billing cycle.
//!
//! The calculation is total: every invalid or degenerate input maps to
//! zero rather than an error, because it runs inline in a price-display
//! path that must never abort over a formatting decision.
//!
//! # Example
//!
//! ```rust
//! use renewal_proration::{Amount, BillingPeriod, ProrationCalculator, ProrationInput};
//! use rust_decimal_macros::dec;
//!
//! let calc = ProrationCalculator::new();
//! let input = ProrationInput {
//!     period: BillingPeriod::Month,
//!     interval: 1,
//!     trial_days: 10,
//!     regular_price: Amount::new(dec!(30.00)),
//! };
//! // 10 of ~30.4375 days => 9.86 at two decimal places
//! assert_eq!(calc.amount_due(&input, 2), Amount::new(dec!(9.86)));
//! ```

use crate::cycle::{days_in_cycle, CycleAuthority, PlatformCycleAuthority};
use crate::{Amount, BillingPeriod};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Inputs to one proration calculation
///
/// All four values must be positive for the calculation to be defined;
/// otherwise the result is exactly zero (nothing due today).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProrationInput {
    pub period: BillingPeriod,
    pub interval: u32,
    /// Days between "now" and the first renewal, computed externally
    pub trial_days: i64,
    pub regular_price: Amount,
}

impl ProrationInput {
    /// Whether the preconditions for a non-zero charge hold
    pub fn is_chargeable(&self) -> bool {
        self.trial_days > 0 && self.interval > 0 && self.regular_price.is_positive()
    }
}

/// Calculator for the prorated first-cycle charge
#[derive(Clone)]
pub struct ProrationCalculator {
    authority: Arc<dyn CycleAuthority>,
}

impl Default for ProrationCalculator {
    fn default() -> Self {
        Self {
            authority: Arc::new(PlatformCycleAuthority),
        }
    }
}

impl ProrationCalculator {
    /// Create a calculator backed by the platform's cycle arithmetic
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom cycle-length authority
    ///
    /// The authority must reproduce the billing platform's own numbers;
    /// see [`CycleAuthority`].
    pub fn with_authority(authority: Arc<dyn CycleAuthority>) -> Self {
        Self { authority }
    }

    /// Amount due today, rounded half-up to `decimals` places
    ///
    /// The result is always in `[0, regular_price]`. Invalid inputs
    /// degrade to zero; no path errors or panics.
    pub fn amount_due(&self, input: &ProrationInput, decimals: u32) -> Amount {
        if !input.is_chargeable() {
            return Amount::zero();
        }

        let cycle = days_in_cycle(&*self.authority, input.period, input.interval);
        // Unreachable given the floor in days_in_cycle, kept so a zero
        // divisor can never slip through.
        if cycle <= Decimal::ZERO {
            return Amount::zero();
        }

        let factor = match Decimal::from(input.trial_days).checked_div(cycle) {
            Some(f) => f.min(Decimal::ONE),
            None => return Amount::zero(),
        };

        let amount = match input.regular_price.as_decimal().checked_mul(factor) {
            Some(a) => Amount::new(a).round_to(decimals),
            None => return Amount::zero(),
        };

        // Rounding can push the amount a fraction above the full price.
        amount.clamp_to(&input.regular_price)
    }
}
