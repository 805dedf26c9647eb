//! Product catalog seam and the per-product opt-in flag
//!
//! The catalog store is owned by the surrounding platform; this crate
//! only reads and writes product meta through the [`ProductCatalog`]
//! trait. The opt-in flag is the single piece of durable state the
//! proration feature has.

use crate::{ProductId, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Meta key holding the per-product proration opt-in flag
pub const PRORATION_FLAG_KEY: &str = "_prorate_first_cycle";

/// Flag value meaning proration is enabled; anything else means disabled
pub const FLAG_ENABLED: &str = "yes";

/// Flag value written when proration is switched off
pub const FLAG_DISABLED: &str = "no";

/// Read/write access to product meta in the platform catalog
pub trait ProductCatalog: Send + Sync {
    /// Fetch a meta value, `None` when the key is absent
    fn get_product_meta(&self, id: ProductId, key: &str) -> Result<Option<String>>;

    /// Persist a meta value
    fn set_product_meta(&self, id: ProductId, key: &str, value: &str) -> Result<()>;
}

/// Whether proration is opted in for a product
///
/// Capability lookup: the value `"yes"` exactly maps to `true`; anything
/// else, including an absent key or a storage failure, maps to `false`.
/// Invalid ids short-circuit without consulting storage.
pub fn is_proration_enabled(catalog: &dyn ProductCatalog, id: ProductId) -> bool {
    if !id.is_valid() {
        return false;
    }
    match catalog.get_product_meta(id, PRORATION_FLAG_KEY) {
        Ok(Some(value)) => value == FLAG_ENABLED,
        Ok(None) => false,
        Err(e) => {
            debug!(product = %id, error = %e, "flag lookup failed, treating as disabled");
            false
        }
    }
}

/// Opt a product into first-cycle proration
pub fn enable_proration(catalog: &dyn ProductCatalog, id: ProductId) -> Result<()> {
    catalog.set_product_meta(id, PRORATION_FLAG_KEY, FLAG_ENABLED)
}

/// Opt a product out of first-cycle proration
pub fn disable_proration(catalog: &dyn ProductCatalog, id: ProductId) -> Result<()> {
    catalog.set_product_meta(id, PRORATION_FLAG_KEY, FLAG_DISABLED)
}

/// In-memory catalog for tests and embedding
pub struct MemoryCatalog {
    entries: Mutex<HashMap<(i64, String), String>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductCatalog for MemoryCatalog {
    fn get_product_meta(&self, id: ProductId, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| crate::ProrationError::Storage(format!("Lock poisoned: {}", e)))?;
        Ok(entries.get(&(id.0, key.to_string())).cloned())
    }

    fn set_product_meta(&self, id: ProductId, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| crate::ProrationError::Storage(format!("Lock poisoned: {}", e)))?;
        entries.insert((id.0, key.to_string()), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingCatalog;

    impl ProductCatalog for FailingCatalog {
        fn get_product_meta(&self, _id: ProductId, _key: &str) -> Result<Option<String>> {
            Err(crate::ProrationError::Storage("catalog offline".to_string()).into())
        }

        fn set_product_meta(&self, _id: ProductId, _key: &str, _value: &str) -> Result<()> {
            Err(crate::ProrationError::Storage("catalog offline".to_string()).into())
        }
    }

    #[test]
    fn test_flag_absent_means_disabled() {
        let catalog = MemoryCatalog::new();
        assert!(!is_proration_enabled(&catalog, ProductId(5)));
    }

    #[test]
    fn test_enable_and_disable() {
        let catalog = MemoryCatalog::new();
        let id = ProductId(5);

        enable_proration(&catalog, id).unwrap();
        assert!(is_proration_enabled(&catalog, id));

        disable_proration(&catalog, id).unwrap();
        assert!(!is_proration_enabled(&catalog, id));
    }

    #[test]
    fn test_only_exact_yes_enables() {
        let catalog = MemoryCatalog::new();
        let id = ProductId(5);

        for value in ["Yes", "YES", "true", "1", "", "enabled"] {
            catalog
                .set_product_meta(id, PRORATION_FLAG_KEY, value)
                .unwrap();
            assert!(!is_proration_enabled(&catalog, id), "value {:?}", value);
        }

        catalog
            .set_product_meta(id, PRORATION_FLAG_KEY, "yes")
            .unwrap();
        assert!(is_proration_enabled(&catalog, id));
    }

    #[test]
    fn test_invalid_id_never_consults_storage() {
        // FailingCatalog errors on every lookup; an invalid id must not
        // reach it at all.
        assert!(!is_proration_enabled(&FailingCatalog, ProductId(0)));
        assert!(!is_proration_enabled(&FailingCatalog, ProductId(-3)));
    }

    #[test]
    fn test_storage_error_means_disabled() {
        assert!(!is_proration_enabled(&FailingCatalog, ProductId(7)));
    }

    #[test]
    fn test_unrelated_meta_keys() {
        let catalog = MemoryCatalog::new();
        let id = ProductId(9);

        catalog.set_product_meta(id, "_regular_price", "30.00").unwrap();
        assert_eq!(
            catalog.get_product_meta(id, "_regular_price").unwrap(),
            Some("30.00".to_string())
        );
        assert!(!is_proration_enabled(&catalog, id));
    }
}
