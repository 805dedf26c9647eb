//! # Renewal Proration
//!
//! Prorated first-cycle pricing for subscription products.
//!
//! When a subscription's first renewal is synced to a fixed date, the
//! first billing cycle is usually partial. This crate computes the
//! prorated charge due today for that partial cycle and gates it behind
//! a per-product opt-in flag stored in the platform's product catalog.
//!
//! Key properties:
//! - Fixed-point decimal arithmetic for all monetary values
//! - The cycle-length denominator comes from the platform's own
//!   arithmetic, so displayed charges reconcile with actual billing
//! - Every invalid input degrades to "nothing due" instead of an error;
//!   the price-display path never aborts
//! - Results are memoized per rendering pass and cached with a TTL,
//!   invalidated eagerly from the catalog update path

pub mod amount;
pub mod cache;
pub mod catalog;
pub mod currency;
pub mod cycle;
pub mod memo;
pub mod product;
pub mod proration;
pub mod schedule;
pub mod service;

pub use amount::Amount;
pub use cache::{cache_key, CacheProvider, MemoryCache, ProrationCache, DEFAULT_TTL};
pub use catalog::{
    disable_proration, enable_proration, is_proration_enabled, MemoryCatalog, ProductCatalog,
    PRORATION_FLAG_KEY,
};
pub use currency::{CurrencySettings, PriceFormat};
pub use cycle::{
    days_in_cycle, days_in_cycle_raw, BillingPeriod, CycleAuthority, PlatformCycleAuthority,
};
pub use memo::RenderMemo;
pub use product::{ProductId, SubscriptionProduct};
pub use proration::{ProrationCalculator, ProrationInput};
pub use schedule::{trial_days_between, FixedSchedule, RenewalSchedule, SECONDS_PER_DAY};
pub use service::ProrationService;

pub type Result<T> = anyhow::Result<T>;

#[derive(thiserror::Error, Debug)]
pub enum ProrationError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("not found: {0}")]
    NotFound(String),
}
