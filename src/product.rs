//! Subscription product attributes
//!
//! The catalog itself lives in the surrounding platform; this crate only
//! sees the handful of attributes proration needs, supplied per call.

use crate::cycle::BillingPeriod;
use crate::proration::ProrationInput;
use crate::Amount;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a product or variation in the platform catalog
///
/// The platform hands ids around as signed integers. Anything
/// non-positive is not a real product and every predicate in this crate
/// treats it as invalid without consulting storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl ProductId {
    /// Whether this id can refer to a stored product
    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The pricing-relevant attributes of one subscription product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionProduct {
    pub id: ProductId,
    pub period: BillingPeriod,
    /// Billing occurs every `interval` periods
    pub interval: u32,
    pub regular_price: Amount,
}

impl SubscriptionProduct {
    /// Create a new product description
    pub fn new(id: ProductId, period: BillingPeriod, interval: u32, regular_price: Amount) -> Self {
        Self {
            id,
            period,
            interval,
            regular_price,
        }
    }

    /// Build the calculator input for a given trial-day count
    pub fn proration_input(&self, trial_days: i64) -> ProrationInput {
        ProrationInput {
            period: self.period,
            interval: self.interval,
            trial_days,
            regular_price: self.regular_price,
        }
    }
}
