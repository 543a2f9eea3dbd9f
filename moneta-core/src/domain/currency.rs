//! Currency domain model

use std::fmt::{Display, Formatter};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::registry::CurrencyRegistry;
use super::result::{Error, Result};

/// Highest supported precision
pub const MAX_DECIMAL_PLACES: u32 = 18;

/// Currency metadata: ISO-style code, display symbol and name, and the
/// number of minor-unit digits.
///
/// On the wire a standalone currency is its bare code string
/// (`"USD"`), resolved through the canonical registry on decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency {
    code: String,
    symbol: String,
    name: String,
    decimal_places: u32,
}

impl Currency {
    /// Create a currency from explicit fields
    pub fn new(
        code: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        decimal_places: u32,
    ) -> Result<Self> {
        let currency = Self {
            code: code.into(),
            symbol: symbol.into(),
            name: name.into(),
            decimal_places,
        };
        currency.validate()?;
        Ok(currency)
    }

    /// Look up a known currency in the canonical table
    pub fn from_code(code: &str) -> Result<Self> {
        CurrencyRegistry::canonical().lookup(code)
    }

    /// Check field invariants, in the same order as construction
    pub fn validate(&self) -> Result<()> {
        if self.code.chars().count() != 3 {
            return Err(Error::validation(
                "currency code must be exactly 3 characters",
            ));
        }
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(Error::validation(
                "decimal places must be between 0 and 18",
            ));
        }
        if self.symbol.is_empty() {
            return Err(Error::validation("currency symbol cannot be empty"));
        }
        if self.name.is_empty() {
            return Err(Error::validation("currency name cannot be empty"));
        }
        Ok(())
    }

    /// Normalize currency code to uppercase
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_uppercase()
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn decimal_places(&self) -> u32 {
        self.decimal_places
    }

    /// Wire representation: the bare code
    pub fn to_primitive(&self) -> &str {
        &self.code
    }

    pub fn from_primitive(code: &str) -> Result<Self> {
        Self::from_code(code)
    }

    /// Render an amount in minor units, e.g. `10050` at precision 2 -> `$100.50`
    ///
    /// The sign goes after the symbol (`$-100.50`).
    pub fn format(&self, minor_units: i64) -> String {
        let sign = if minor_units < 0 { "-" } else { "" };
        let magnitude = minor_units.unsigned_abs();
        if self.decimal_places == 0 {
            return format!("{}{}{}", self.symbol, sign, magnitude);
        }

        // 10^18 still fits in u64
        let scale = 10u64.pow(self.decimal_places);
        format!(
            "{}{}{}.{:0width$}",
            self.symbol,
            sign,
            magnitude / scale,
            magnitude % scale,
            width = self.decimal_places as usize
        )
    }

    /// Render a decimal amount, rounded half away from zero to this precision
    pub fn format_decimal(&self, amount: Decimal) -> String {
        let mut rounded =
            amount.round_dp_with_strategy(self.decimal_places, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        format!(
            "{}{:.prec$}",
            self.symbol,
            rounded,
            prec = self.decimal_places as usize
        )
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}

impl TryFrom<String> for Currency {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::from_code(&value)
    }
}

impl TryFrom<&str> for Currency {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::from_code(value)
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.code
    }
}
