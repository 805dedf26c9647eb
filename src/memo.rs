//! Request-scoped memoization
//!
//! A price-display pass can ask for the same proration several times
//! (list view, price string, cart preview). The table lives with the
//! rendering context and is passed in explicitly, so repeated calls in
//! one pass skip recomputation without any process-wide mutable state.

use crate::Amount;
use std::collections::HashMap;

/// Memoization table for one rendering pass
#[derive(Debug, Default)]
pub struct RenderMemo {
    entries: HashMap<String, Amount>,
}

impl RenderMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Amount> {
        self.entries.get(key).copied()
    }

    pub fn insert(&mut self, key: String, amount: Amount) {
        self.entries.insert(key, amount);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
