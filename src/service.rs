//! Proration service
//!
//! Wires the calculator to its collaborators: the opt-in flag in the
//! product catalog, the renewal schedule, the currency configuration and
//! the result cache. One instance serves a whole price-rendering request;
//! everything here is synchronous and request-scoped.

use crate::cache::{cache_key, CacheProvider, ProrationCache};
use crate::catalog::{self, ProductCatalog};
use crate::currency::PriceFormat;
use crate::memo::RenderMemo;
use crate::proration::ProrationCalculator;
use crate::schedule::{trial_days_between, RenewalSchedule};
use crate::{Amount, ProductId, Result, SubscriptionProduct};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Computes the "due today" amount for subscription products
pub struct ProrationService {
    catalog: Arc<dyn ProductCatalog>,
    schedule: Arc<dyn RenewalSchedule>,
    price_format: Arc<dyn PriceFormat>,
    calculator: ProrationCalculator,
    cache: ProrationCache,
}

impl ProrationService {
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        schedule: Arc<dyn RenewalSchedule>,
        price_format: Arc<dyn PriceFormat>,
        cache_provider: Arc<dyn CacheProvider>,
    ) -> Self {
        Self {
            catalog,
            schedule,
            price_format,
            calculator: ProrationCalculator::new(),
            cache: ProrationCache::new(cache_provider),
        }
    }

    /// Use a custom calculator (e.g. one bridged to the live platform's
    /// cycle arithmetic)
    pub fn with_calculator(mut self, calculator: ProrationCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    /// Override the cache entry lifetime
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = self.cache.with_ttl(ttl);
        self
    }

    /// Whether proration is opted in for a product
    pub fn is_proration_enabled(&self, id: ProductId) -> bool {
        catalog::is_proration_enabled(&*self.catalog, id)
    }

    /// Amount due today for a product, seen from `now` (UTC Unix seconds)
    ///
    /// `None` means nothing is due today: proration is disabled for the
    /// product (the platform then charges the full price and delays the
    /// first renewal by one interval — that policy is the caller's), the
    /// schedule produced no renewal date, or the renewal already covers
    /// the full cycle.
    pub fn due_today(&self, product: &SubscriptionProduct, now: i64) -> Option<Amount> {
        if !self.is_proration_enabled(product.id) {
            debug!(product = %product.id, "proration disabled, skipping");
            return None;
        }
        let first_renewal = self.schedule.first_renewal_at(product, now)?;
        let trial_days = trial_days_between(now, first_renewal);
        if trial_days <= 0 {
            return None;
        }
        Some(self.amount_for(product, trial_days))
    }

    /// Like [`Self::due_today`], consulting a request-scoped memo table
    /// before the shared cache
    pub fn due_today_memoized(
        &self,
        memo: &mut RenderMemo,
        product: &SubscriptionProduct,
        now: i64,
    ) -> Option<Amount> {
        if !self.is_proration_enabled(product.id) {
            return None;
        }
        let first_renewal = self.schedule.first_renewal_at(product, now)?;
        let trial_days = trial_days_between(now, first_renewal);
        if trial_days <= 0 {
            return None;
        }

        let decimals = self.price_format.decimal_places();
        let key = cache_key(product.id, &product.proration_input(trial_days), decimals);
        if let Some(hit) = memo.get(&key) {
            return Some(hit);
        }
        let amount = self.amount_for(product, trial_days);
        memo.insert(key, amount);
        Some(amount)
    }

    /// The "due today" line appended to a displayed price string
    pub fn due_today_text(&self, product: &SubscriptionProduct, now: i64) -> Option<String> {
        self.due_today(product, now)
            .map(|amount| format!("{} due today", self.price_format.format(&amount)))
    }

    /// Write product meta through the catalog, invalidating cached
    /// prorations for the product after a successful write
    pub fn set_product_meta(&self, id: ProductId, key: &str, value: &str) -> Result<()> {
        self.catalog.set_product_meta(id, key, value)?;
        self.cache.invalidate_product(id);
        Ok(())
    }

    /// Opt a product into first-cycle proration
    pub fn enable_proration(&self, id: ProductId) -> Result<()> {
        self.set_product_meta(id, catalog::PRORATION_FLAG_KEY, catalog::FLAG_ENABLED)
    }

    /// Opt a product out of first-cycle proration
    pub fn disable_proration(&self, id: ProductId) -> Result<()> {
        self.set_product_meta(id, catalog::PRORATION_FLAG_KEY, catalog::FLAG_DISABLED)
    }

    /// Drop cached prorations for a product
    ///
    /// For catalog stores that are written outside this service.
    pub fn invalidate_product(&self, id: ProductId) {
        self.cache.invalidate_product(id);
    }

    fn amount_for(&self, product: &SubscriptionProduct, trial_days: i64) -> Amount {
        let input = product.proration_input(trial_days);
        let decimals = self.price_format.decimal_places();
        let key = cache_key(product.id, &input, decimals);

        if let Some(hit) = self.cache.get(&key) {
            trace!(key, "proration cache hit");
            return hit;
        }

        let amount = self.calculator.amount_due(&input, decimals);
        self.cache.put(product.id, &key, &amount);
        trace!(key, %amount, "proration computed");
        amount
    }
}
