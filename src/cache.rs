//! Memoization cache for proration results
//!
//! The calculation is a pure function of its key, so cache entries are
//! immutable once written and concurrent recomputation under a miss is
//! tolerated rather than prevented. Cache-layer failure must stay
//! invisible to callers: a broken provider behaves as a permanent miss,
//! never as an error in the price path.

use crate::proration::ProrationInput;
use crate::{Amount, ProductId};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, trace};

/// Default entry lifetime
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Generic key-value cache with TTL
///
/// Implementations swallow backend failures: `get` returns `None`, `set`
/// and `delete` become no-ops. Get/set/delete are assumed atomic
/// primitives of the host environment.
pub trait CacheProvider: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str, ttl: Duration);
    fn delete(&self, key: &str);
}

/// Cache key for one proration computation
///
/// The price is rendered at the currency's precision so equal prices
/// always collide regardless of trailing zeros in the source data.
pub fn cache_key(product: ProductId, input: &ProrationInput, decimals: u32) -> String {
    format!(
        "prorate:{}:{}:{}:{}:{}",
        product,
        input.period.as_str(),
        input.interval,
        input.trial_days,
        input.regular_price.to_precision_string(decimals)
    )
}

/// In-memory cache provider for tests and single-process embedding
pub struct MemoryCache {
    // key -> (value, expires_at unix seconds)
    entries: Mutex<HashMap<String, (String, i64)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of live entries (for tests)
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheProvider for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().ok()?;
        let now = chrono::Utc::now().timestamp();
        let (value, expires_at) = entries.get(key)?.clone();
        if expires_at <= now {
            entries.remove(key);
            return None;
        }
        Some(value)
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) {
        if let Ok(mut entries) = self.entries.lock() {
            let expires_at = chrono::Utc::now().timestamp() + ttl.as_secs() as i64;
            entries.insert(key.to_string(), (value.to_string(), expires_at));
        }
    }

    fn delete(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

/// Read-through cache for proration amounts with per-product invalidation
///
/// Providers only expose delete-by-key, so this wrapper keeps an index of
/// the keys written for each product. Invalidation is driven by explicit
/// calls from the catalog update path, not by global hooks.
pub struct ProrationCache {
    provider: std::sync::Arc<dyn CacheProvider>,
    ttl: Duration,
    keys_by_product: Mutex<HashMap<i64, HashSet<String>>>,
}

impl ProrationCache {
    pub fn new(provider: std::sync::Arc<dyn CacheProvider>) -> Self {
        Self {
            provider,
            ttl: DEFAULT_TTL,
            keys_by_product: Mutex::new(HashMap::new()),
        }
    }

    /// Override the entry lifetime
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Look up a previously computed amount
    ///
    /// An unparseable cached value is dropped and treated as a miss.
    pub fn get(&self, key: &str) -> Option<Amount> {
        let raw = self.provider.get(key)?;
        match Amount::from_str(&raw) {
            Ok(amount) => Some(amount),
            Err(_) => {
                debug!(key, "dropping unparseable cache entry");
                self.provider.delete(key);
                None
            }
        }
    }

    /// Store a computed amount and index its key for invalidation
    pub fn put(&self, product: ProductId, key: &str, amount: &Amount) {
        self.provider.set(key, &amount.to_string(), self.ttl);
        if let Ok(mut index) = self.keys_by_product.lock() {
            index.entry(product.0).or_default().insert(key.to_string());
        }
    }

    /// Eagerly drop every cached amount for a product
    pub fn invalidate_product(&self, product: ProductId) {
        let keys = match self.keys_by_product.lock() {
            Ok(mut index) => index.remove(&product.0).unwrap_or_default(),
            Err(_) => return,
        };
        for key in &keys {
            self.provider.delete(key);
        }
        if !keys.is_empty() {
            trace!(product = %product, dropped = keys.len(), "invalidated cached prorations");
        }
    }
}
