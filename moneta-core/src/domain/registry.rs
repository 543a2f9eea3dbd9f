//! Read-only currency lookup table
//!
//! The canonical table is built once, on first use, and never mutated.
//! Callers that need extra currencies build their own registry through
//! [`CurrencyRegistryBuilder`] and then hand the frozen value around.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use super::currency::Currency;
use super::result::{Error, Result};

/// (code, symbol, name, decimal places)
const CANONICAL_CURRENCIES: &[(&str, &str, &str, u32)] = &[
    ("USD", "$", "US Dollar", 2),
    ("EUR", "€", "Euro", 2),
    ("GBP", "£", "British Pound", 2),
    ("JPY", "¥", "Japanese Yen", 0),
    ("CNY", "¥", "Chinese Yuan", 2),
    ("KRW", "₩", "South Korean Won", 0),
    ("VND", "₫", "Vietnamese Dong", 0),
    ("INR", "₹", "Indian Rupee", 2),
    ("CHF", "CHF", "Swiss Franc", 2),
    ("CAD", "C$", "Canadian Dollar", 2),
    ("AUD", "A$", "Australian Dollar", 2),
    ("KWD", "KD", "Kuwaiti Dinar", 3),
    ("BHD", "BD", "Bahraini Dinar", 3),
    ("BTC", "₿", "Bitcoin", 8),
    ("ETH", "Ξ", "Ether", 18),
];

static CANONICAL: Lazy<CurrencyRegistry> = Lazy::new(|| {
    let entries = CANONICAL_CURRENCIES
        .iter()
        .map(|&(code, symbol, name, places)| {
            // every row must validate
            let currency = Currency::new(code, symbol, name, places)
                .unwrap_or_else(|e| panic!("canonical currency {code} is invalid: {e}"));
            (code.to_string(), currency)
        })
        .collect();
    CurrencyRegistry { entries }
});

/// Immutable map from currency code to currency metadata
#[derive(Debug, Clone, Default)]
pub struct CurrencyRegistry {
    entries: BTreeMap<String, Currency>,
}

impl CurrencyRegistry {
    /// Process-wide registry holding the built-in table
    pub fn canonical() -> &'static CurrencyRegistry {
        &CANONICAL
    }

    /// Start an empty registry
    pub fn builder() -> CurrencyRegistryBuilder {
        CurrencyRegistryBuilder {
            entries: BTreeMap::new(),
        }
    }

    /// Start a registry pre-populated with the canonical table
    pub fn with_canonical() -> CurrencyRegistryBuilder {
        CurrencyRegistryBuilder {
            entries: CANONICAL.entries.clone(),
        }
    }

    /// Find a currency by code (trimmed, case-insensitive)
    pub fn lookup(&self, code: &str) -> Result<Currency> {
        self.entries
            .get(&Currency::normalize_code(code))
            .cloned()
            .ok_or_else(|| Error::UnsupportedCurrency(code.to_string()))
    }

    pub fn decimal_places(&self, code: &str) -> Option<u32> {
        self.entries
            .get(&Currency::normalize_code(code))
            .map(Currency::decimal_places)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(&Currency::normalize_code(code))
    }

    /// Known codes in sorted order
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects entries before freezing them into a [`CurrencyRegistry`]
#[derive(Debug, Clone)]
pub struct CurrencyRegistryBuilder {
    entries: BTreeMap<String, Currency>,
}

impl CurrencyRegistryBuilder {
    /// Add or replace an entry; the currency is re-validated
    pub fn register(mut self, currency: Currency) -> Result<Self> {
        currency.validate()?;
        self.entries
            .insert(Currency::normalize_code(currency.code()), currency);
        Ok(self)
    }

    pub fn build(self) -> CurrencyRegistry {
        CurrencyRegistry {
            entries: self.entries,
        }
    }
}
