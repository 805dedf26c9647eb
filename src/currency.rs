//! Currency configuration seam
//!
//! Rounding precision is not fixed at two places; it comes from the
//! active currency configuration supplied by the platform. Rendering a
//! localized price string belongs to the platform's formatter — the
//! [`PriceFormat::format`] hook exists so embedders can plug theirs in.

use crate::Amount;

/// Active currency configuration
pub trait PriceFormat: Send + Sync {
    /// Number of decimal places prices are rounded and displayed at
    fn decimal_places(&self) -> u32;

    /// Render an amount as a price string
    fn format(&self, amount: &Amount) -> String;
}

/// Plain symbol-prefix currency settings
#[derive(Debug, Clone)]
pub struct CurrencySettings {
    pub symbol: String,
    pub decimals: u32,
}

impl CurrencySettings {
    pub fn new(symbol: impl Into<String>, decimals: u32) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
        }
    }
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self::new("$", 2)
    }
}

impl PriceFormat for CurrencySettings {
    fn decimal_places(&self) -> u32 {
        self.decimals
    }

    fn format(&self, amount: &Amount) -> String {
        format!(
            "{}{}",
            self.symbol,
            amount.to_precision_string(self.decimals)
        )
    }
}
