//! Renewal schedule seam and trial-day arithmetic
//!
//! The first renewal instant for a product is computed by the billing
//! platform (it owns the sync rules); this crate only turns the distance
//! between "now" and that instant into a whole-day count. Instants are
//! UTC Unix seconds throughout — the platform hands out UTC-formatted
//! dates, so "now" is assumed UTC-normalized.

use crate::SubscriptionProduct;
use std::collections::HashMap;
use std::sync::Mutex;

pub const SECONDS_PER_DAY: i64 = 86_400;

/// External calculator of first renewal instants
pub trait RenewalSchedule: Send + Sync {
    /// First renewal instant for `product`, seen from `from`
    ///
    /// `None` means the platform could not produce a renewal date, in
    /// which case nothing is due today.
    fn first_renewal_at(&self, product: &SubscriptionProduct, from: i64) -> Option<i64>;
}

/// Days between `now` and `first_renewal`, rounded up
///
/// A result of zero or less means the first renewal already covers the
/// full cycle and the calculator must not be invoked.
pub fn trial_days_between(now: i64, first_renewal: i64) -> i64 {
    let delta = first_renewal - now;
    // Ceiling division; correct for negative deltas too.
    (delta + SECONDS_PER_DAY - 1).div_euclid(SECONDS_PER_DAY)
}

/// Schedule with explicitly pinned renewal instants, for tests and
/// embedders that precompute dates elsewhere
pub struct FixedSchedule {
    renewals: Mutex<HashMap<i64, i64>>,
}

impl FixedSchedule {
    pub fn new() -> Self {
        Self {
            renewals: Mutex::new(HashMap::new()),
        }
    }

    /// Pin the first renewal instant for a product
    pub fn set_renewal(&self, product_id: i64, instant: i64) {
        if let Ok(mut renewals) = self.renewals.lock() {
            renewals.insert(product_id, instant);
        }
    }
}

impl Default for FixedSchedule {
    fn default() -> Self {
        Self::new()
    }
}

impl RenewalSchedule for FixedSchedule {
    fn first_renewal_at(&self, product: &SubscriptionProduct, _from: i64) -> Option<i64> {
        self.renewals
            .lock()
            .ok()
            .and_then(|renewals| renewals.get(&product.id.0).copied())
    }
}
