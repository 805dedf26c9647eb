//! Billing cycle length arithmetic
//!
//! The proration factor's denominator must always match the commerce
//! platform's own renewal-date arithmetic. The platform computes cycle
//! lengths from fixed calendar averages, so [`PlatformCycleAuthority`]
//! carries those constants bit-identically. Embedders that bridge to the
//! live platform can supply their own [`CycleAuthority`] instead; the
//! entry points in this module floor whatever the authority returns so a
//! broken implementation can never produce a zero or negative divisor.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Average days per month used by the platform's renewal arithmetic.
pub const AVG_DAYS_PER_MONTH: Decimal = dec!(30.4375);

/// Average days per year used by the platform's renewal arithmetic.
pub const AVG_DAYS_PER_YEAR: Decimal = dec!(365.25);

/// Days per week.
pub const DAYS_PER_WEEK: Decimal = dec!(7);

/// A recurring billing period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    Week,
    Month,
    Year,
}

impl BillingPeriod {
    /// Parse a period string as the platform stores it
    ///
    /// Returns `None` for anything outside the enumerated set; callers
    /// that hold a raw string must treat `None` as "do not prorate".
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "week" => Some(BillingPeriod::Week),
            "month" => Some(BillingPeriod::Month),
            "year" => Some(BillingPeriod::Year),
            _ => None,
        }
    }

    /// The platform's storage spelling of this period
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingPeriod::Week => "week",
            BillingPeriod::Month => "month",
            BillingPeriod::Year => "year",
        }
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Source of canonical billing-cycle lengths
///
/// Implementations must return the same value the billing platform uses
/// when scheduling renewals. An independent set of day-count constants
/// that drifts from the platform's is a correctness bug: the displayed
/// charge would no longer reconcile with what actually gets billed.
pub trait CycleAuthority: Send + Sync {
    /// Average number of days in one billing cycle of `interval` periods
    fn days_in_cycle(&self, period: BillingPeriod, interval: u32) -> Decimal;
}

/// The platform's own cycle-length arithmetic
///
/// Fixed calendar averages multiplied by the interval count.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformCycleAuthority;

impl CycleAuthority for PlatformCycleAuthority {
    fn days_in_cycle(&self, period: BillingPeriod, interval: u32) -> Decimal {
        let per_period = match period {
            BillingPeriod::Week => DAYS_PER_WEEK,
            BillingPeriod::Month => AVG_DAYS_PER_MONTH,
            BillingPeriod::Year => AVG_DAYS_PER_YEAR,
        };
        per_period * Decimal::from(interval)
    }
}

/// Cycle length with the safety floor applied
///
/// Guarantees a strictly positive result: a zero `interval` or a
/// non-positive authority result yields `1`, a degenerate default that
/// disables meaningful proration without raising an error.
pub fn days_in_cycle(
    authority: &dyn CycleAuthority,
    period: BillingPeriod,
    interval: u32,
) -> Decimal {
    if interval == 0 {
        return Decimal::ONE;
    }
    let days = authority.days_in_cycle(period, interval);
    if days <= Decimal::ZERO {
        Decimal::ONE
    } else {
        days
    }
}

/// Cycle length from raw, untrusted inputs
///
/// Unknown period strings and non-positive intervals yield `1`.
pub fn days_in_cycle_raw(authority: &dyn CycleAuthority, period: &str, interval: i64) -> Decimal {
    match (BillingPeriod::parse(period), u32::try_from(interval)) {
        (Some(period), Ok(interval)) if interval > 0 => {
            days_in_cycle(authority, period, interval)
        }
        _ => Decimal::ONE,
    }
}
